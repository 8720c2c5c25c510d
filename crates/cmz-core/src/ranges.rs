//! Discrete parameter values spanned by the model grid.

use crate::ModelFamily;

/// A gridded parameter and the values it takes.
#[derive(Debug, Clone, Copy)]
pub struct ParameterRange {
    pub name: &'static str,
    pub values: &'static [f64],
}

const HOTCORE: &[ParameterRange] = &[
    ParameterRange {
        name: "final_temp",
        values: &[100., 150., 200., 250., 300., 350., 400., 450., 500.],
    },
    ParameterRange {
        name: "initialDens",
        values: &[1.0e6, 1.0e7, 1.0e8],
    },
    ParameterRange {
        name: "zeta",
        values: &[10., 100., 1000., 10000.],
    },
    ParameterRange {
        name: "radfield",
        values: &[1000., 10000.],
    },
    ParameterRange {
        name: "initialTemp",
        values: &[15., 20., 25., 30., 35.],
    },
];

const CSHOCK: &[ParameterRange] = &[
    ParameterRange {
        name: "shock_vel",
        values: &[10., 15., 20., 25., 30., 35., 40.],
    },
    ParameterRange {
        name: "initialDens",
        values: &[1.0e4, 1.0e5, 1.0e6],
    },
    ParameterRange {
        name: "zeta",
        values: &[10., 100., 1000., 10000.],
    },
    ParameterRange {
        name: "radfield",
        values: &[10., 100., 1000., 10000.],
    },
    ParameterRange {
        name: "initialTemp",
        values: &[15., 20., 25., 30., 35.],
    },
];

pub fn for_family(family: ModelFamily) -> &'static [ParameterRange] {
    match family {
        ModelFamily::HotCore => HOTCORE,
        ModelFamily::Shock => CSHOCK,
    }
}

/// Values of one gridded parameter, if the family grids it.
pub fn values(family: ModelFamily, name: &str) -> Option<&'static [f64]> {
    for_family(family)
        .iter()
        .find(|range| range.name == name)
        .map(|range| range.values)
}
