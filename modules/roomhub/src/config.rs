use serde::{Deserialize, Serialize};

/// What happens when a submitted event collides with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Refuse the write and report the colliding events.
    #[default]
    Reject,
    /// Persist anyway and log the collision.
    Warn,
}

/// Configuration for the roomhub module, read from `modules.roomhub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomhubConfig {
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
}

impl Default for RoomhubConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            conflict_policy: ConflictPolicy::default(),
            max_title_length: default_max_title_length(),
        }
    }
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_max_title_length() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: RoomhubConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(cfg.seed_demo_data);
        assert_eq!(cfg.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(cfg.max_title_length, 200);
    }

    #[test]
    fn warn_policy_parses() {
        let cfg: RoomhubConfig = serde_json::from_value(serde_json::json!({
            "conflict_policy": "warn",
            "seed_demo_data": false
        }))
        .unwrap();
        assert_eq!(cfg.conflict_policy, ConflictPolicy::Warn);
        assert!(!cfg.seed_demo_data);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let res: Result<RoomhubConfig, _> =
            serde_json::from_value(serde_json::json!({ "conflict_policy": "ignore" }));
        assert!(res.is_err());
    }
}
