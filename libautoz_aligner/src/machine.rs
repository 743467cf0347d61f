use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::MachineError;

/// The tester a pair of log files was taken from.
///
/// The tag selects which anchor locator is used on the AutoZ log. The ALL log is
/// read the same way for every tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MachineType {
    #[default]
    #[serde(rename = "J750")]
    J750,
    #[serde(rename = "J750EX")]
    J750Ex,
    #[serde(rename = "UFLEX")]
    Uflex,
    #[serde(rename = "ETS88")]
    Ets88,
    #[serde(rename = "Accotest")]
    Accotest,
    #[serde(rename = "AG93000")]
    Ag93000,
    #[serde(rename = "T2K")]
    T2k,
}

/// Testers which share an AutoZ log vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineFamily {
    J750,
    Ets88,
    Ag93000,
    T2k,
}

impl MachineType {
    pub const ALL: [MachineType; 7] = [
        MachineType::J750,
        MachineType::J750Ex,
        MachineType::Uflex,
        MachineType::Ets88,
        MachineType::Accotest,
        MachineType::Ag93000,
        MachineType::T2k,
    ];

    pub fn family(&self) -> MachineFamily {
        match self {
            Self::J750 | Self::J750Ex | Self::Uflex => MachineFamily::J750,
            Self::Ets88 | Self::Accotest => MachineFamily::Ets88,
            Self::Ag93000 => MachineFamily::Ag93000,
            Self::T2k => MachineFamily::T2k,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::J750 => "J750",
            Self::J750Ex => "J750EX",
            Self::Uflex => "UFLEX",
            Self::Ets88 => "ETS88",
            Self::Accotest => "Accotest",
            Self::Ag93000 => "AG93000",
            Self::T2k => "T2K",
        }
    }
}

impl Display for MachineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MachineType {
    type Err = MachineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|machine| machine.as_str() == s)
            .copied()
            .ok_or_else(|| MachineError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for machine in MachineType::ALL {
            assert_eq!(MachineType::from_str(machine.as_str()).unwrap(), machine);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert!(MachineType::from_str("j750").is_err());
        assert!(MachineType::from_str("V93000").is_err());
    }

    #[test]
    fn test_families() {
        assert_eq!(MachineType::Uflex.family(), MachineFamily::J750);
        assert_eq!(MachineType::Accotest.family(), MachineFamily::Ets88);
        assert_eq!(MachineType::Ag93000.family(), MachineFamily::Ag93000);
        assert_eq!(MachineType::T2k.family(), MachineFamily::T2k);
    }

    #[test]
    fn test_yaml_tag() {
        let yaml = serde_yaml::to_string(&MachineType::J750Ex).unwrap();
        assert_eq!(yaml.trim(), "J750EX");
        let machine: MachineType = serde_yaml::from_str("AG93000").unwrap();
        assert_eq!(machine, MachineType::Ag93000);
    }
}
