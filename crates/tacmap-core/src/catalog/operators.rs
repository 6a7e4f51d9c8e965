//! Operator roster.

use crate::elements::OperatorIcon;
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    fn badge_color(&self) -> &'static str {
        match self {
            Side::Attacker => "#2b6cb0",
            Side::Defender => "#c05621",
        }
    }
}

/// An operator that can be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfig {
    pub id: String,
    pub name_key: String,
    /// Icon source (SVG markup, data URL or asset path).
    pub icon: String,
    pub side: Side,
}

impl OperatorConfig {
    pub fn new(id: impl Into<String>, side: Side, icon: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name_key: format!("operators.{id}"),
            id,
            icon: icon.into(),
            side,
        }
    }

    /// Operator with a generated badge icon.
    fn badged(id: &str, side: Side) -> Self {
        Self::new(id, side, badge_svg(id, side))
    }

    /// A default-sized icon of this operator at `position`.
    pub fn place(&self, position: Point) -> OperatorIcon {
        OperatorIcon::new(position, self.id.clone(), self.icon.clone())
    }
}

/// Round badge with the operator's initials.
fn badge_svg(id: &str, side: Side) -> String {
    let initials: String = id.chars().take(2).collect::<String>().to_uppercase();
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><circle cx="32" cy="32" r="30" fill="{}" stroke="#ffffff" stroke-width="3"/><text x="32" y="41" font-family="sans-serif" font-size="24" font-weight="bold" fill="#ffffff" text-anchor="middle">{}</text></svg>"##,
        side.badge_color(),
        initials
    )
}

const ATTACKERS: &[&str] = &[
    "sledge", "thatcher", "ash", "thermite", "twitch", "montagne", "glaz", "fuze", "blitz", "iq", "buck",
    "blackbeard", "capitao", "hibana", "jackal", "ying", "zofia", "dokkaebi", "lion", "finka", "maverick",
    "nomad", "gridlock", "nokk", "amaru", "kali", "iana", "ace", "zero", "flores", "osa", "sens", "grim",
    "brava", "ram",
];

const DEFENDERS: &[&str] = &[
    "smoke", "mute", "castle", "pulse", "doc", "rook", "kapkan", "tachanka", "jager", "bandit", "frost",
    "valkyrie", "caveira", "echo", "mira", "lesion", "ela", "vigil", "maestro", "alibi", "clash", "kaid",
    "mozzie", "warden", "goyo", "wamai", "oryx", "melusi", "aruni", "thunderbird", "thorn", "azami", "solis",
    "fenrir", "tubarao",
];

/// Lookup table of operators, attackers first.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCatalog {
    operators: Vec<OperatorConfig>,
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OperatorCatalog {
    pub fn new(operators: Vec<OperatorConfig>) -> Self {
        Self { operators }
    }

    pub fn builtin() -> Self {
        let attackers = ATTACKERS.iter().map(|id| OperatorConfig::badged(id, Side::Attacker));
        let defenders = DEFENDERS.iter().map(|id| OperatorConfig::badged(id, Side::Defender));
        Self::new(attackers.chain(defenders).collect())
    }

    pub fn get(&self, id: &str) -> Option<&OperatorConfig> {
        self.operators.iter().find(|op| op.id == id)
    }

    pub fn operators(&self) -> &[OperatorConfig] {
        &self.operators
    }

    pub fn by_side(&self, side: Side) -> impl Iterator<Item = &OperatorConfig> {
        self.operators.iter().filter(move |op| op.side == side)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster() {
        let catalog = OperatorCatalog::builtin();
        assert_eq!(catalog.len(), ATTACKERS.len() + DEFENDERS.len());
        assert_eq!(catalog.by_side(Side::Attacker).count(), ATTACKERS.len());

        let ash = catalog.get("ash").unwrap();
        assert_eq!(ash.name_key, "operators.ash");
        assert_eq!(ash.side, Side::Attacker);
        assert!(ash.icon.starts_with("<svg"));
        assert!(ash.icon.contains(">AS<"));
    }

    #[test]
    fn test_place_uses_icon_source() {
        let catalog = OperatorCatalog::builtin();
        let smoke = catalog.get("smoke").unwrap();
        let icon = smoke.place(Point::new(1.0, 2.0));
        assert_eq!(icon.operator_id, "smoke");
        assert_eq!(icon.icon, smoke.icon);
    }
}
