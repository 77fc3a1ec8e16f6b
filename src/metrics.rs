//! The exported gauges and their update rules.

use std::collections::BTreeMap;

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::coerce::{to_bool_number, to_number};
use crate::records::{ConfigRecord, DownstreamChannel, EventEntry, StatusRecord, UpstreamChannel};

const NAMESPACE: &str = "sb8200";

/// Every metric this exporter publishes, registered in its own registry.
///
/// Gauges update atomically, so readers never see a torn value. Values of
/// different documents may come from different cycles.
pub struct ModemMetrics {
    registry: Registry,

    /// `sb8200_modem_up`
    pub up: Gauge,

    pub downstream_frequency: Gauge,
    pub downstream_power: Gauge,
    pub downstream_snr: Gauge,

    pub channel_plan: Gauge,
    pub led_status: Gauge,
    pub eee_state: Gauge,

    pub downstream_channel_frequency: GaugeVec,
    pub downstream_channel_power: GaugeVec,
    pub downstream_channel_snr: GaugeVec,
    pub downstream_channel_locked: GaugeVec,
    pub downstream_channel_corrected: GaugeVec,
    pub downstream_channel_uncorrectable: GaugeVec,

    pub upstream_channel_power: GaugeVec,
    pub upstream_channel_frequency: GaugeVec,
    pub upstream_channel_locked: GaugeVec,

    /// Entries per lower-cased severity level
    pub eventlog_count: GaugeVec,

    /// Reset channel vectors before each publish, dropping channels the modem
    /// no longer reports.
    clear_stale_channels: bool,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> prometheus::Result<Gauge> {
    let gauge = Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    label: &str,
) -> prometheus::Result<GaugeVec> {
    let vec = GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), &[label])?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

impl ModemMetrics {
    pub fn new(clear_stale_channels: bool) -> prometheus::Result<ModemMetrics> {
        let r = Registry::new();

        let channel = |name: &str, help: &str| gauge_vec(&r, name, help, "channel");

        Ok(ModemMetrics {
            up: gauge(
                &r,
                "modem_up",
                "Whether the last scrape of the modem was successful (1) or failed (0)",
            )?,

            downstream_frequency: gauge(
                &r,
                "downstream_frequency_hz",
                "Primary downstream frequency in Hz",
            )?,
            downstream_power: gauge(
                &r,
                "downstream_power_dbmv",
                "Primary downstream power in dBmV",
            )?,
            downstream_snr: gauge(&r, "downstream_snr_db", "Primary downstream SNR in dB")?,

            channel_plan: gauge(
                &r,
                "channel_plan",
                "Channel plan (1=North America, 2=Europe, etc)",
            )?,
            led_status: gauge(&r, "led_status", "LED status (0=Off, 1=On)")?,
            eee_state: gauge(
                &r,
                "eee_state",
                "Energy Efficient Ethernet port state (0=Disabled, 1=Enabled)",
            )?,

            downstream_channel_frequency: channel(
                "downstream_channel_frequency_hz",
                "Downstream channel frequency in Hz",
            )?,
            downstream_channel_power: channel(
                "downstream_channel_power_dbmv",
                "Downstream channel power in dBmV",
            )?,
            downstream_channel_snr: channel(
                "downstream_channel_snr_db",
                "Downstream channel SNR in dB",
            )?,
            downstream_channel_locked: channel(
                "downstream_channel_locked",
                "Downstream channel lock status (1=Locked, 0=Unlocked)",
            )?,
            downstream_channel_corrected: channel(
                "downstream_channel_corrected",
                "Corrected codeword count per downstream channel",
            )?,
            downstream_channel_uncorrectable: channel(
                "downstream_channel_uncorrectable",
                "Uncorrectable codeword count per downstream channel",
            )?,

            upstream_channel_power: channel(
                "upstream_channel_power_dbmv",
                "Upstream channel power in dBmV",
            )?,
            upstream_channel_frequency: channel(
                "upstream_channel_frequency_hz",
                "Upstream channel center frequency in Hz",
            )?,
            upstream_channel_locked: channel(
                "upstream_channel_locked",
                "Upstream channel lock status (1=Locked, 0=Unlocked)",
            )?,

            eventlog_count: gauge_vec(
                &r,
                "eventlog_count",
                "Number of event log entries by severity level",
                "level",
            )?,

            registry: r,
            clear_stale_channels,
        })
    }

    pub fn set_liveness(&self, ok: bool) {
        self.up.set(if ok { 1.0 } else { 0.0 });
    }

    pub fn publish_status(&self, status: &StatusRecord) {
        self.downstream_frequency.set(to_number(&status.frequency));
        self.downstream_power.set(to_number(&status.power));
        self.downstream_snr.set(to_number(&status.snr));
    }

    pub fn publish_config(&self, config: &ConfigRecord) {
        self.channel_plan.set(to_number(&config.channel_plan));
        self.led_status.set(to_number(&config.led_control));
        self.eee_state.set(to_number(&config.eee_port_state));
    }

    pub fn publish_downstream(&self, channels: &[DownstreamChannel]) {
        if self.clear_stale_channels {
            self.downstream_channel_frequency.reset();
            self.downstream_channel_power.reset();
            self.downstream_channel_snr.reset();
            self.downstream_channel_locked.reset();
            self.downstream_channel_corrected.reset();
            self.downstream_channel_uncorrectable.reset();
        }

        for ch in channels {
            let id = [ch.id.as_str()];
            self.downstream_channel_frequency
                .with_label_values(&id)
                .set(to_number(&ch.frequency));
            self.downstream_channel_power
                .with_label_values(&id)
                .set(to_number(&ch.power));
            self.downstream_channel_snr
                .with_label_values(&id)
                .set(to_number(&ch.snr));
            self.downstream_channel_locked
                .with_label_values(&id)
                .set(to_bool_number(&ch.lock));
            self.downstream_channel_corrected
                .with_label_values(&id)
                .set(to_number(&ch.corrected));
            self.downstream_channel_uncorrectable
                .with_label_values(&id)
                .set(to_number(&ch.uncorrectable));
        }
    }

    pub fn publish_upstream(&self, channels: &[UpstreamChannel]) {
        if self.clear_stale_channels {
            self.upstream_channel_power.reset();
            self.upstream_channel_frequency.reset();
            self.upstream_channel_locked.reset();
        }

        for ch in channels {
            let id = [ch.id.as_str()];
            self.upstream_channel_power
                .with_label_values(&id)
                .set(to_number(&ch.power));
            self.upstream_channel_frequency
                .with_label_values(&id)
                .set(to_number(&ch.frequency));
            self.upstream_channel_locked
                .with_label_values(&id)
                .set(to_bool_number(&ch.lock));
        }
    }

    /// Replace the per-level counts; levels missing from `entries` disappear.
    pub fn publish_event_counts(&self, entries: &[EventEntry]) {
        let counts = level_counts(entries);

        self.eventlog_count.reset();
        for (level, count) in &counts {
            self.eventlog_count
                .with_label_values(&[level.as_str()])
                .set(*count as f64);
        }
    }

    /// Prometheus text exposition of every metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn content_type() -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

/// Entries per `level_key`, sorted by level.
pub fn level_counts(entries: &[EventEntry]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.level_key()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{level_counts, ModemMetrics};
    use crate::records::{
        ConfigRecord, DownstreamChannel, EventEntry, StatusRecord, UpstreamChannel,
    };

    /// Value of the sample `series` (name plus labels) in a text exposition.
    pub(crate) fn sample(text: &str, series: &str) -> Option<f64> {
        text.lines()
            .filter(|line| !line.starts_with('#'))
            .find_map(|line| line.strip_prefix(series)?.strip_prefix(' '))
            .and_then(|value| value.trim().parse().ok())
    }

    fn event(level: &str) -> EventEntry {
        EventEntry {
            level: level.to_string(),
            ..Default::default()
        }
    }

    fn downstream(id: &str, power: &str) -> DownstreamChannel {
        DownstreamChannel {
            id: id.to_string(),
            lock: "Locked".to_string(),
            modulation: "QAM256".to_string(),
            frequency: "591000000 Hz".to_string(),
            power: power.to_string(),
            snr: "40.3 dB".to_string(),
            corrected: "12".to_string(),
            uncorrectable: "oops".to_string(),
        }
    }

    #[test]
    fn fresh_metrics_render() {
        let metrics = ModemMetrics::new(false).unwrap();
        let text = metrics.render().unwrap();

        assert_eq!(sample(&text, "sb8200_modem_up"), Some(0.0));
        assert_eq!(sample(&text, "sb8200_downstream_power_dbmv"), Some(0.0));
        assert_eq!(sample(&text, "sb8200_channel_plan"), Some(0.0));
        // vectors without label sets are not exported at all
        assert!(!text.contains("sb8200_eventlog_count{"));
    }

    #[test]
    fn scalars() {
        let metrics = ModemMetrics::new(false).unwrap();
        metrics.set_liveness(true);
        metrics.publish_status(&StatusRecord {
            frequency: "591000000 Hz".to_string(),
            power: "6.1 dBmV".to_string(),
            snr: "40.3 dB".to_string(),
            ..Default::default()
        });
        metrics.publish_config(&ConfigRecord {
            channel_plan: "1".to_string(),
            led_control: "".to_string(),
            eee_port_state: "1".to_string(),
        });

        let text = metrics.render().unwrap();
        assert_eq!(sample(&text, "sb8200_modem_up"), Some(1.0));
        assert_eq!(
            sample(&text, "sb8200_downstream_frequency_hz"),
            Some(591000000.0)
        );
        assert_eq!(sample(&text, "sb8200_downstream_power_dbmv"), Some(6.1));
        assert_eq!(sample(&text, "sb8200_downstream_snr_db"), Some(40.3));
        assert_eq!(sample(&text, "sb8200_channel_plan"), Some(1.0));
        assert_eq!(sample(&text, "sb8200_led_status"), Some(0.0));
        assert_eq!(sample(&text, "sb8200_eee_state"), Some(1.0));

        metrics.set_liveness(false);
        assert_eq!(metrics.up.get(), 0.0);
    }

    #[test]
    fn channels_keep_stale_labels() {
        let metrics = ModemMetrics::new(false).unwrap();
        metrics.publish_downstream(&[downstream("3", "6.1 dBmV"), downstream("159", "-1.2 dBmV")]);
        metrics.publish_downstream(&[downstream("3", "5.0 dBmV")]);

        let text = metrics.render().unwrap();
        let power = "sb8200_downstream_channel_power_dbmv";
        assert_eq!(
            sample(&text, &format!("{}{{channel=\"3\"}}", power)),
            Some(5.0)
        );
        assert_eq!(
            sample(&text, &format!("{}{{channel=\"159\"}}", power)),
            Some(-1.2)
        );

        let locked = "sb8200_downstream_channel_locked{channel=\"3\"}";
        let corrected = "sb8200_downstream_channel_corrected{channel=\"3\"}";
        let uncorrectable = "sb8200_downstream_channel_uncorrectable{channel=\"3\"}";
        assert_eq!(sample(&text, locked), Some(1.0));
        assert_eq!(sample(&text, corrected), Some(12.0));
        assert_eq!(sample(&text, uncorrectable), Some(0.0));
    }

    #[test]
    fn channels_clear_stale_labels_when_asked() {
        let metrics = ModemMetrics::new(true).unwrap();
        metrics.publish_downstream(&[downstream("3", "6.1 dBmV"), downstream("159", "-1.2 dBmV")]);
        metrics.publish_downstream(&[downstream("3", "5.0 dBmV")]);

        let text = metrics.render().unwrap();
        assert!(text.contains("channel=\"3\""));
        assert!(!text.contains("channel=\"159\""));
    }

    #[test]
    fn upstream_channels() {
        let metrics = ModemMetrics::new(false).unwrap();
        metrics.publish_upstream(&[UpstreamChannel {
            id: "2".to_string(),
            lock: "Not Locked".to_string(),
            modulation: "SC-QAM".to_string(),
            frequency: "36000000 Hz".to_string(),
            power: "44.0 dBmV".to_string(),
        }]);

        let text = metrics.render().unwrap();
        assert_eq!(
            sample(&text, "sb8200_upstream_channel_power_dbmv{channel=\"2\"}"),
            Some(44.0)
        );
        assert_eq!(
            sample(&text, "sb8200_upstream_channel_frequency_hz{channel=\"2\"}"),
            Some(36000000.0)
        );
        assert_eq!(
            sample(&text, "sb8200_upstream_channel_locked{channel=\"2\"}"),
            Some(0.0)
        );
    }

    #[test]
    fn level_counts_fold_case() {
        let counts = level_counts(&[event("Error"), event("error"), event(" WARNING ")]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["error"], 2);
        assert_eq!(counts["warning"], 1);
    }

    #[test]
    fn event_counts_drop_old_levels() {
        let metrics = ModemMetrics::new(false).unwrap();
        metrics.publish_event_counts(&[event("Notice"), event("Critical")]);
        metrics.publish_event_counts(&[event("Error"), event("error"), event(" WARNING ")]);

        let text = metrics.render().unwrap();
        assert_eq!(
            sample(&text, "sb8200_eventlog_count{level=\"error\"}"),
            Some(2.0)
        );
        assert_eq!(
            sample(&text, "sb8200_eventlog_count{level=\"warning\"}"),
            Some(1.0)
        );
        assert!(!text.contains("level=\"notice\""));
        assert!(!text.contains("level=\"critical\""));

        metrics.publish_event_counts(&[]);
        let text = metrics.render().unwrap();
        assert!(!text.contains("sb8200_eventlog_count{"));
    }
}
