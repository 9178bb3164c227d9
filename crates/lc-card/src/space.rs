//! The declared experiment space: eras, analyses, channels, processes.
//!
//! Every other component validates its tokens against this registry before
//! mutating anything, so a typo in a driver script shows up as a warning
//! and a rejected call instead of a silently wrong card.

/// Wildcard token matching every member of a dimension.
pub const WILDCARD: &str = "all";

/// One of the four axes of the experiment space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Data-taking era (7TeV, 8TeV, 13TeV, ...).
    Era,
    /// Analysis name.
    Analysis,
    /// Analysis channel.
    Channel,
    /// Signal or background process.
    Process,
}

impl Dimension {
    /// Human-readable label used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Era => "Era",
            Dimension::Analysis => "Analysis",
            Dimension::Channel => "Channel",
            Dimension::Process => "Process",
        }
    }
}

/// Ordered vocabularies for the four dimensions, insertion order preserved.
///
/// Processes are tagged signal or background at creation; the two ordered
/// partitions fix the column order of the rendered card (signals first).
#[derive(Debug, Clone, Default)]
pub struct SpaceRegistry {
    eras: Vec<String>,
    analyses: Vec<String>,
    channels: Vec<String>,
    processes: Vec<String>,
    signals: Vec<String>,
    backgrounds: Vec<String>,
}

impl SpaceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_token(list: &mut Vec<String>, token: &str, what: &'static str) -> bool {
        if list.iter().any(|t| t.as_str() == token) {
            tracing::warn!("{} {} already added.", what, token);
            false
        } else {
            list.push(token.to_string());
            true
        }
    }

    /// Add an era. Duplicate adds warn and are ignored.
    pub fn add_era(&mut self, era: &str) {
        Self::add_token(&mut self.eras, era, "Era");
    }

    /// Add an analysis. Duplicate adds warn and are ignored.
    pub fn add_analysis(&mut self, analysis: &str) {
        Self::add_token(&mut self.analyses, analysis, "Analysis");
    }

    /// Add a channel. Duplicate adds warn and are ignored.
    pub fn add_channel(&mut self, channel: &str) {
        Self::add_token(&mut self.channels, channel, "Channel");
    }

    /// Add a process, tagged signal or background. Duplicate adds warn and
    /// are ignored; the tag is immutable once added.
    pub fn add_process(&mut self, process: &str, signal: bool) {
        if Self::add_token(&mut self.processes, process, "Process") {
            if signal {
                self.signals.push(process.to_string());
            } else {
                self.backgrounds.push(process.to_string());
            }
        }
    }

    /// Registered eras, in insertion order.
    pub fn eras(&self) -> &[String] {
        &self.eras
    }

    /// Registered analyses, in insertion order.
    pub fn analyses(&self) -> &[String] {
        &self.analyses
    }

    /// Registered channels, in insertion order.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// All registered processes, in insertion order.
    pub fn processes(&self) -> &[String] {
        &self.processes
    }

    /// Signal processes, in insertion order.
    pub fn signals(&self) -> &[String] {
        &self.signals
    }

    /// Background processes, in insertion order.
    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    /// Whether `process` is registered as a signal.
    pub fn is_signal(&self, process: &str) -> bool {
        self.signals.iter().any(|p| p.as_str() == process)
    }

    /// Registered tokens for a dimension.
    pub fn tokens(&self, dim: Dimension) -> &[String] {
        match dim {
            Dimension::Era => &self.eras,
            Dimension::Analysis => &self.analyses,
            Dimension::Channel => &self.channels,
            Dimension::Process => &self.processes,
        }
    }

    /// True iff every token is the wildcard or already registered.
    ///
    /// Each unrecognized token is logged. Callers must not mutate anything
    /// when this returns false.
    pub fn validate(&self, dim: Dimension, tokens: &[String]) -> bool {
        let stored = self.tokens(dim);
        let mut good = true;
        for t in tokens {
            if t == WILDCARD {
                continue;
            }
            if !stored.iter().any(|s| s == t) {
                tracing::warn!("{} {} not recognized.", dim.label(), t);
                good = false;
            }
        }
        good
    }
}

/// Membership test shared by every dimension: a subset covers a token when
/// it lists the token itself or the wildcard.
pub fn covers(subset: &[String], token: &str) -> bool {
    subset.iter().any(|t| t.as_str() == WILDCARD || t.as_str() == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SpaceRegistry {
        let mut space = SpaceRegistry::new();
        space.add_era("13TeV");
        space.add_analysis("Hpp3l");
        space.add_channel("eee");
        space.add_process("hpp", true);
        space.add_process("datadriven", false);
        space
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut space = registry();
        space.add_era("13TeV");
        space.add_process("hpp", false);
        assert_eq!(space.eras().len(), 1);
        assert_eq!(space.processes().len(), 2);
        // the original signal tag survives the duplicate add
        assert!(space.is_signal("hpp"));
    }

    #[test]
    fn test_signal_background_partition() {
        let space = registry();
        assert_eq!(space.signals(), ["hpp".to_string()]);
        assert_eq!(space.backgrounds(), ["datadriven".to_string()]);
    }

    #[test]
    fn test_validate() {
        let space = registry();
        assert!(space.validate(Dimension::Era, &["13TeV".into()]));
        assert!(space.validate(Dimension::Era, &[WILDCARD.into()]));
        assert!(!space.validate(Dimension::Era, &["8TeV".into()]));
        assert!(!space.validate(Dimension::Channel, &["eee".into(), "eem".into()]));
    }

    #[test]
    fn test_covers() {
        let subset = vec!["eee".to_string(), "eem".to_string()];
        assert!(covers(&subset, "eee"));
        assert!(!covers(&subset, "emm"));
        assert!(covers(&[WILDCARD.to_string()], "anything"));
    }
}
