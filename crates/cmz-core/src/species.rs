//! Tracked chemical species.
//!
//! Species names follow the grid's column convention: a bare name is a gas-phase
//! abundance, `#NAME` the ice surface and `@NAME` the ice bulk.

use serde::{Deserialize, Serialize};

/// Physical phase of a tracked species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Gas,
    Surface,
    Bulk,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Gas, Phase::Bulk, Phase::Surface];

    /// Phase of a species column, from its naming prefix.
    pub fn of(name: &str) -> Phase {
        match name.as_bytes().first() {
            Some(b'#') => Phase::Surface,
            Some(b'@') => Phase::Bulk,
            _ => Phase::Gas,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Phase::Gas => "",
            Phase::Surface => "#",
            Phase::Bulk => "@",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Gas => "gas",
            Phase::Surface => "surface",
            Phase::Bulk => "bulk",
        }
    }
}

pub const DIATOMIC: &[&str] = &["CS", "SO", "SIO", "NS+"];
pub const TRIATOMIC: &[&str] = &["C2S", "HCN", "HNC", "HCO", "HCO+"];
pub const TETRATOMIC: &[&str] = &["H2CO", "HNCO"];
pub const POLYATOMIC: &[&str] = &["HC3N", "CH2CO"];
/// Complex organic molecules.
pub const COMS: &[&str] = &[
    "CH3CN", "CH3OH", "CH3SH", "NH2CHO", "CH3CCH", "CH3CHO", "CH3NCO", "HCOOCH3", "C2H5CN",
    "C2H5OH", "CH3OCH3",
];

/// Gas-phase ions have no ice counterpart.
fn freezes_out(name: &str) -> bool {
    !name.ends_with('+')
}

fn in_phase(groups: &[&[&str]], phase: Phase) -> Vec<String> {
    groups
        .iter()
        .flat_map(|group| group.iter())
        .filter(|name| phase == Phase::Gas || freezes_out(name))
        .map(|name| format!("{}{}", phase.prefix(), name))
        .collect()
}

const ALL_GROUPS: &[&[&str]] = &[DIATOMIC, TRIATOMIC, TETRATOMIC, POLYATOMIC, COMS];
const SMALL_GROUPS: &[&[&str]] = &[DIATOMIC, TRIATOMIC, TETRATOMIC, POLYATOMIC];

/// All tracked species of one phase.
pub fn by_phase(phase: Phase) -> Vec<String> {
    in_phase(ALL_GROUPS, phase)
}

/// Every tracked species: gas, then bulk, then surface.
pub fn all() -> Vec<String> {
    Phase::ALL.into_iter().flat_map(by_phase).collect()
}

/// Every tracked species except the complex organic molecules.
pub fn excluding_coms() -> Vec<String> {
    Phase::ALL
        .into_iter()
        .flat_map(|phase| in_phase(SMALL_GROUPS, phase))
        .collect()
}

/// HTML label for a molecule: digits become subscripts, `+` a superscript and
/// the grid's `SI` spelling becomes `Si`.
pub fn format_molecule_html(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    let mut out = String::with_capacity(label.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            out.push_str("<sub>");
            out.push(c);
            out.push_str("</sub>");
        } else if c == '+' {
            out.push_str("<sup>+</sup>");
        } else if c == 'S' && chars.get(i + 1) == Some(&'I') {
            out.push_str("Si");
            i += 1;
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_from_prefix() {
        assert_eq!(Phase::of("CH3OH"), Phase::Gas);
        assert_eq!(Phase::of("#CH3OH"), Phase::Surface);
        assert_eq!(Phase::of("@CH3OH"), Phase::Bulk);
    }

    #[test]
    fn ions_stay_in_gas_phase() {
        let gas = by_phase(Phase::Gas);
        let surface = by_phase(Phase::Surface);
        assert!(gas.iter().any(|s| s == "HCO+"));
        assert!(gas.iter().any(|s| s == "NS+"));
        assert!(!surface.iter().any(|s| s.ends_with('+')));
        assert_eq!(gas.len(), 24);
        assert_eq!(surface.len(), 22);
        assert_eq!(by_phase(Phase::Bulk).len(), 22);
    }

    #[test]
    fn all_is_gas_bulk_surface() {
        let all = all();
        assert_eq!(all.len(), 68);
        assert_eq!(all[0], "CS");
        assert_eq!(all[24], "@CS");
        assert_eq!(all[46], "#CS");
        assert!(all.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn excluding_coms_drops_complex_organics() {
        let small = excluding_coms();
        assert!(!small.iter().any(|s| s.trim_start_matches(['#', '@']) == "CH3OH"));
        assert_eq!(small.len(), 13 + 11 + 11);
    }

    #[test]
    fn molecule_html_labels() {
        assert_eq!(format_molecule_html("CH3OH"), "CH<sub>3</sub>OH");
        assert_eq!(format_molecule_html("HCO+"), "HCO<sup>+</sup>");
        assert_eq!(format_molecule_html("SIO"), "SiO");
        assert_eq!(format_molecule_html("CS"), "CS");
    }
}
