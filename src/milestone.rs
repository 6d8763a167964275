use chrono::{DateTime, Duration, Local};

/// How long a milestone banner stays up
pub const MILESTONE_DISPLAY_MS: i64 = 2000;

/// Speed bands shared by milestones and metric colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Normal,
    Good,
    Great,
    Amazing,
}

impl Tier {
    pub fn for_apm(apm: u32) -> Self {
        match apm {
            100.. => Tier::Amazing,
            80..=99 => Tier::Great,
            60..=79 => Tier::Good,
            _ => Tier::Normal,
        }
    }

    pub fn for_streak(streak: u32) -> Self {
        match streak {
            50.. => Tier::Amazing,
            35..=49 => Tier::Great,
            20..=34 => Tier::Good,
            _ => Tier::Normal,
        }
    }

    fn milestone_message(self) -> Option<&'static str> {
        match self {
            Tier::Amazing => Some("🏆 Amazing! 100+ APM"),
            Tier::Great => Some("🌟 Great! 80+ APM"),
            Tier::Good => Some("⭐ Good! 60+ APM"),
            Tier::Normal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: &'static str,
    pub expires_at: DateTime<Local>,
}

/// Announces each apm tier once per run, higher tiers only, as a
/// transient banner.
#[derive(Debug, Default)]
pub struct Milestones {
    highest: Option<Tier>,
    visible: Option<Notification>,
}

impl Milestones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the latest apm. Returns true when a new banner was raised; a
    /// visible lower banner is replaced.
    pub fn observe(&mut self, apm: u32, now: DateTime<Local>) -> bool {
        let tier = Tier::for_apm(apm);
        let Some(message) = tier.milestone_message() else {
            return false;
        };
        if self.highest.is_some_and(|h| tier <= h) {
            return false;
        }
        self.highest = Some(tier);
        self.visible = Some(Notification {
            message,
            expires_at: now + Duration::milliseconds(MILESTONE_DISPLAY_MS),
        });
        tracing::debug!(apm, banner = message, "milestone reached");
        true
    }

    /// Drop the banner once its display time has passed
    pub fn expire(&mut self, now: DateTime<Local>) {
        if self.visible.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.visible = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.visible = None;
    }

    pub fn visible(&self) -> Option<&Notification> {
        self.visible.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_match_thresholds() {
        assert_eq!(Tier::for_apm(59), Tier::Normal);
        assert_eq!(Tier::for_apm(60), Tier::Good);
        assert_eq!(Tier::for_apm(80), Tier::Great);
        assert_eq!(Tier::for_apm(250), Tier::Amazing);
        assert_eq!(Tier::for_streak(19), Tier::Normal);
        assert_eq!(Tier::for_streak(20), Tier::Good);
        assert_eq!(Tier::for_streak(35), Tier::Great);
        assert_eq!(Tier::for_streak(50), Tier::Amazing);
    }

    #[test]
    fn announces_each_tier_once_and_only_upwards() {
        let now = Local::now();
        let mut milestones = Milestones::new();

        assert!(!milestones.observe(40, now));
        assert!(milestones.observe(65, now));
        assert!(!milestones.observe(70, now));
        assert!(milestones.observe(85, now));
        assert!(!milestones.observe(62, now));
        assert!(milestones.observe(120, now));
        assert_eq!(milestones.visible().unwrap().message, "🏆 Amazing! 100+ APM");
    }

    #[test]
    fn banner_expires_after_display_time() {
        let now = Local::now();
        let mut milestones = Milestones::new();
        milestones.observe(61, now);

        milestones.expire(now + Duration::milliseconds(1999));
        assert!(milestones.visible().is_some());

        milestones.expire(now + Duration::milliseconds(MILESTONE_DISPLAY_MS));
        assert!(milestones.visible().is_none());
    }

    #[test]
    fn higher_tier_replaces_visible_banner() {
        let now = Local::now();
        let mut milestones = Milestones::new();
        milestones.observe(61, now);
        let later = now + Duration::milliseconds(1500);
        milestones.observe(90, later);

        let banner = milestones.visible().unwrap();
        assert_eq!(banner.message, "🌟 Great! 80+ APM");
        assert_eq!(banner.expires_at, later + Duration::milliseconds(2000));
    }
}
