use core::convert::Infallible;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Privilege rank of a role. Higher rank means equal or greater privilege.
///
/// Several roles share a rank, so ranks form a total preorder over roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    /// Rank of `viewer` and of every unrecognized role.
    pub const LOWEST: Rank = Rank(0);

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for Rank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application role recorded on a user's profile (`user_profiles.app_role`).
///
/// The vocabulary is closed. Anything outside it parses to [`Role::Unknown`],
/// which carries the normalized text and ranks as [`Rank::LOWEST`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Viewer,
    TeamMember,
    TeamLeader,
    InspectionResponsible,
    Scrutineer,
    TrackMarshal,
    DesignJudgeSoftware,
    DesignJudgeMechanical,
    DesignJudgeElectronics,
    DesignJudgeOverall,
    BpJudge,
    CmJudge,
    Admin,
    Unknown(UnknownRole),
}

/// Normalized text of a role outside the vocabulary.
///
/// Only [`Role::parse`] builds one, so the text is lower-case and never a
/// known role name: serializing and parsing it again cannot change its rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownRole(String);

impl UnknownRole {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Role {
    /// Every recognized role, in ascending rank order.
    pub const KNOWN: [Role; 13] = [
        Role::Viewer,
        Role::TeamMember,
        Role::TeamLeader,
        Role::InspectionResponsible,
        Role::Scrutineer,
        Role::TrackMarshal,
        Role::DesignJudgeSoftware,
        Role::DesignJudgeMechanical,
        Role::DesignJudgeElectronics,
        Role::DesignJudgeOverall,
        Role::BpJudge,
        Role::CmJudge,
        Role::Admin,
    ];

    /// Parse a role name, case-insensitively. Never fails.
    pub fn parse(name: &str) -> Role {
        let normalized = name.to_lowercase();
        match normalized.as_str() {
            "viewer" => Role::Viewer,
            "team_member" => Role::TeamMember,
            "team_leader" => Role::TeamLeader,
            "inspection_responsible" => Role::InspectionResponsible,
            "scrutineer" => Role::Scrutineer,
            "track_marshal" => Role::TrackMarshal,
            "design_judge_software" => Role::DesignJudgeSoftware,
            "design_judge_mechanical" => Role::DesignJudgeMechanical,
            "design_judge_electronics" => Role::DesignJudgeElectronics,
            "design_judge_overall" => Role::DesignJudgeOverall,
            "bp_judge" => Role::BpJudge,
            "cm_judge" => Role::CmJudge,
            "admin" => Role::Admin,
            _ => Role::Unknown(UnknownRole(normalized)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Viewer => "viewer",
            Role::TeamMember => "team_member",
            Role::TeamLeader => "team_leader",
            Role::InspectionResponsible => "inspection_responsible",
            Role::Scrutineer => "scrutineer",
            Role::TrackMarshal => "track_marshal",
            Role::DesignJudgeSoftware => "design_judge_software",
            Role::DesignJudgeMechanical => "design_judge_mechanical",
            Role::DesignJudgeElectronics => "design_judge_electronics",
            Role::DesignJudgeOverall => "design_judge_overall",
            Role::BpJudge => "bp_judge",
            Role::CmJudge => "cm_judge",
            Role::Admin => "admin",
            Role::Unknown(name) => name.as_str(),
        }
    }

    pub const fn rank(&self) -> Rank {
        match self {
            Role::Viewer | Role::Unknown(_) => Rank::LOWEST,
            Role::TeamMember => Rank(1),
            Role::TeamLeader => Rank(2),
            Role::InspectionResponsible => Rank(3),
            Role::Scrutineer | Role::TrackMarshal => Rank(4),
            Role::DesignJudgeSoftware
            | Role::DesignJudgeMechanical
            | Role::DesignJudgeElectronics
            | Role::DesignJudgeOverall
            | Role::BpJudge
            | Role::CmJudge => Rank(5),
            Role::Admin => Rank(10),
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }

    /// Does this role meet or exceed `required`?
    pub fn meets(&self, required: &Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Human-readable description for audit and admin screens.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Role::Viewer => Some("Read-only access to public competition data"),
            Role::TeamMember => Some("Member of a registered team"),
            Role::TeamLeader => Some("Team leader; manages the team's roster and submissions"),
            Role::InspectionResponsible => {
                Some("Team contact responsible for technical inspection")
            }
            Role::Scrutineer => Some("Performs technical inspection of vehicles"),
            Role::TrackMarshal => Some("Official supervising dynamic events on track"),
            Role::DesignJudgeSoftware => Some("Design event judge for software"),
            Role::DesignJudgeMechanical => Some("Design event judge for mechanical systems"),
            Role::DesignJudgeElectronics => Some("Design event judge for electronics"),
            Role::DesignJudgeOverall => Some("Design event judge with overall responsibility"),
            Role::BpJudge => Some("Business plan presentation judge"),
            Role::CmJudge => Some("Cost and manufacturing judge"),
            Role::Admin => Some("Competition administrator with full access"),
            Role::Unknown(_) => None,
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(s))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Unknown(UnknownRole(name)) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
