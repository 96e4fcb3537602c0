//! Per-species phenology configuration.
//!
//! Every species runs the same state machine (see [`crate::model`]); what
//! differs is captured here as a palette plus a spring and a fall program.
//! GDD thresholds are in degree days above the base temperature, chill
//! thresholds in chill units, day lengths in hours and calendar windows in
//! day of year.

use crate::color::{BlendMode, Rgb};
use crate::thresholds::LocationModifiers;
use serde::Serialize;

/// Phase colors shared by every program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    /// Bare branches before leaf-out
    pub dormant: Rgb,
    /// Freshly opened foliage
    pub juvenile: Rgb,
    /// Summer foliage
    pub mature: Rgb,
    /// After fall: bare branches, or held dry leaves for marcescent species
    pub bare: Rgb,
}

/// What happens to the leaves once fall is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeafRetention {
    Deciduous,
    /// Dead leaves stay on the tree through winter
    Marcescent,
    Evergreen,
}

/// Spring strategy, in unadjusted or adjusted GDD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpringProgram {
    /// Juvenile to mature between `start` and `mature`.
    LeafOut { start: f64, mature: f64 },
    /// Dormant to juvenile over the first half of the window, juvenile to
    /// mature over the second.
    LeafOutViaJuvenile { start: f64, mature: f64 },
    /// Flowers open on bare wood, fade into juvenile leaves, then leaves mature.
    BloomThenLeaf {
        bud: Rgb,
        bloom: Rgb,
        /// GDD before `bloom_start` over which buds visibly swell
        bud_swell_lead: Option<f64>,
        bloom_start: f64,
        bloom_peak: f64,
        bloom_end: f64,
        leaf_start: f64,
        leaf_mature: f64,
    },
    /// Leaves mature first, then flowers are drawn over the foliage.
    LeafThenBloom {
        bloom: Rgb,
        leaf_start: f64,
        bloom_start: f64,
        bloom_peak: f64,
        bloom_end: f64,
    },
    /// A single flat bloom color, then mature foliage with no juvenile stage.
    SolidBloom { bloom: Rgb, start: f64, end: f64 },
    /// Evergreen new growth: mature to flush color and back.
    EvergreenFlush {
        flush: Rgb,
        start: f64,
        peak: f64,
        end: f64,
    },
}

impl SpringProgram {
    /// GDD at which the tree leaves its dormant color.
    pub fn wake(&self) -> f64 {
        match *self {
            SpringProgram::LeafOut { start, .. } | SpringProgram::LeafOutViaJuvenile { start, .. } => {
                start
            }
            SpringProgram::BloomThenLeaf { bloom_start, .. } => bloom_start,
            SpringProgram::LeafThenBloom { leaf_start, .. } => leaf_start,
            SpringProgram::SolidBloom { start, .. } | SpringProgram::EvergreenFlush { start, .. } => {
                start
            }
        }
    }

    /// GDD at which spring is over and the summer plateau begins.
    pub fn complete(&self) -> f64 {
        match *self {
            SpringProgram::LeafOut { mature, .. } | SpringProgram::LeafOutViaJuvenile { mature, .. } => {
                mature
            }
            SpringProgram::BloomThenLeaf {
                bloom_end,
                leaf_mature,
                ..
            } => bloom_end.max(leaf_mature),
            SpringProgram::LeafThenBloom { bloom_end, .. } => bloom_end,
            SpringProgram::SolidBloom { end, .. } | SpringProgram::EvergreenFlush { end, .. } => end,
        }
    }

    fn scaled(&self, gdd: impl Fn(f64) -> f64) -> Self {
        match *self {
            SpringProgram::LeafOut { start, mature } => SpringProgram::LeafOut {
                start: gdd(start),
                mature: gdd(mature),
            },
            SpringProgram::LeafOutViaJuvenile { start, mature } => {
                SpringProgram::LeafOutViaJuvenile {
                    start: gdd(start),
                    mature: gdd(mature),
                }
            }
            SpringProgram::BloomThenLeaf {
                bud,
                bloom,
                bud_swell_lead,
                bloom_start,
                bloom_peak,
                bloom_end,
                leaf_start,
                leaf_mature,
            } => SpringProgram::BloomThenLeaf {
                bud,
                bloom,
                bud_swell_lead,
                bloom_start: gdd(bloom_start),
                bloom_peak: gdd(bloom_peak),
                bloom_end: gdd(bloom_end),
                leaf_start: gdd(leaf_start),
                leaf_mature: gdd(leaf_mature),
            },
            SpringProgram::LeafThenBloom {
                bloom,
                leaf_start,
                bloom_start,
                bloom_peak,
                bloom_end,
            } => SpringProgram::LeafThenBloom {
                bloom,
                leaf_start: gdd(leaf_start),
                bloom_start: gdd(bloom_start),
                bloom_peak: gdd(bloom_peak),
                bloom_end: gdd(bloom_end),
            },
            SpringProgram::SolidBloom { bloom, start, end } => SpringProgram::SolidBloom {
                bloom,
                start: gdd(start),
                end: gdd(end),
            },
            SpringProgram::EvergreenFlush {
                flush,
                start,
                peak,
                end,
            } => SpringProgram::EvergreenFlush {
                flush,
                start: gdd(start),
                peak: gdd(peak),
                end: gdd(end),
            },
        }
    }
}

/// How the fall peak color is chosen for a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PeakColor {
    Fixed(Rgb),
    /// First band whose UV threshold is exceeded wins; bands are listed from
    /// the highest threshold down.
    UvBands {
        bands: &'static [(f64, Rgb)],
        otherwise: Rgb,
    },
    /// Above `min_uv`, blend from `base` toward `toward` by the UV factor.
    UvBlend { base: Rgb, toward: Rgb, min_uv: f64 },
    /// Muted peak under severe drought, vivid otherwise.
    Drought { vivid: Rgb, muted: Rgb },
}

/// Fall strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FallProgram {
    /// Driven by shortening days. Drought stress raises the start threshold
    /// by up to `drought_advance` hours so dry trees turn sooner.
    Photoperiod {
        start_dl: f64,
        peak_dl: f64,
        end_dl: f64,
        drought_advance: f64,
        peak: PeakColor,
        /// Color reached at `end_dl`; the bare color when absent
        late: Option<Rgb>,
    },
    /// Driven by accumulated chill once the fall season has begun; fades
    /// from mature to the bare color over `span` chill units.
    Chill { onset: f64, span: f64 },
    /// Fixed calendar window.
    Calendar {
        start_doy: f64,
        peak_doy: f64,
        end_doy: f64,
        peak: PeakColor,
    },
    None,
}

impl FallProgram {
    fn scaled(&self, chill: impl Fn(f64) -> f64) -> Self {
        match *self {
            FallProgram::Chill { onset, span } => FallProgram::Chill {
                onset: chill(onset),
                span: chill(span),
            },
            other => other,
        }
    }
}

/// Static description of one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesProfile {
    /// USDA PLANTS symbol
    pub symbol: &'static str,
    /// Lower-case common name accepted as an alternative symbol
    pub alias: &'static str,
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    pub palette: Palette,
    pub spring: SpringProgram,
    pub fall: FallProgram,
    /// Color shown when a recent hard freeze has killed the foliage
    pub freeze_color: Rgb,
    pub retention: LeafRetention,
    pub blend: BlendMode,
}

/// A profile whose GDD and chill thresholds have been scaled for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedProfile {
    pub profile: SpeciesProfile,
    pub modifiers: LocationModifiers,
}

impl SpeciesProfile {
    pub fn adjusted(&self, modifiers: &LocationModifiers) -> AdjustedProfile {
        let mut profile = self.clone();
        profile.spring = self.spring.scaled(|v| modifiers.gdd(v));
        profile.fall = self.fall.scaled(|v| modifiers.chill(v));
        AdjustedProfile {
            profile,
            modifiers: *modifiers,
        }
    }
}

const BROWN: Rgb = Rgb::new(101, 67, 33);

pub const NORWAY_MAPLE: SpeciesProfile = SpeciesProfile {
    symbol: "ACPL",
    alias: "norway_maple",
    common_name: "Norway Maple",
    scientific_name: "Acer platanoides",
    palette: Palette {
        dormant: Rgb::new(110, 100, 90),
        juvenile: Rgb::new(160, 200, 100),
        mature: Rgb::new(54, 124, 43),
        bare: BROWN,
    },
    spring: SpringProgram::LeafOut {
        start: 200.0,
        mature: 300.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.0,
        peak_dl: 10.0,
        end_dl: 9.0,
        drought_advance: 1.5,
        peak: PeakColor::UvBlend {
            base: Rgb::new(240, 190, 40),
            toward: Rgb::new(220, 140, 20),
            min_uv: 0.3,
        },
        late: None,
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

/// Red maple runs the Norway maple model under its own name.
pub const RED_MAPLE: SpeciesProfile = SpeciesProfile {
    symbol: "ACRU",
    alias: "red_maple",
    common_name: "Red Maple",
    scientific_name: "Acer rubrum",
    ..NORWAY_MAPLE
};

pub const SWEETGUM: SpeciesProfile = SpeciesProfile {
    symbol: "LIST2",
    alias: "sweetgum",
    common_name: "Sweetgum",
    scientific_name: "Liquidambar styraciflua",
    palette: Palette {
        dormant: Rgb::new(100, 90, 80),
        juvenile: Rgb::new(120, 160, 80),
        mature: Rgb::new(34, 139, 34),
        bare: BROWN,
    },
    spring: SpringProgram::LeafOut {
        start: 250.0,
        mature: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.0,
        peak_dl: 10.0,
        end_dl: 9.0,
        drought_advance: 1.5,
        peak: PeakColor::UvBands {
            bands: &[(0.5, Rgb::new(75, 0, 130)), (0.2, Rgb::new(220, 20, 60))],
            otherwise: Rgb::new(240, 200, 50),
        },
        late: None,
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const RED_OAK: SpeciesProfile = SpeciesProfile {
    symbol: "QURU",
    alias: "red_oak",
    common_name: "Northern Red Oak",
    scientific_name: "Quercus rubra",
    palette: Palette {
        dormant: Rgb::new(90, 80, 70),
        juvenile: Rgb::new(180, 100, 100),
        mature: Rgb::new(50, 100, 40),
        bare: Rgb::new(139, 69, 19),
    },
    spring: SpringProgram::LeafOutViaJuvenile {
        start: 250.0,
        mature: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.5,
        peak_dl: 10.5,
        end_dl: 9.5,
        drought_advance: 1.5,
        peak: PeakColor::Fixed(Rgb::new(165, 42, 42)),
        late: None,
    },
    freeze_color: Rgb::new(139, 69, 19),
    retention: LeafRetention::Marcescent,
    blend: BlendMode::Hsl,
};

pub const DOUGLAS_FIR: SpeciesProfile = SpeciesProfile {
    symbol: "PSME",
    alias: "douglas_fir",
    common_name: "Douglas Fir",
    scientific_name: "Pseudotsuga menziesii",
    palette: Palette {
        dormant: Rgb::new(1, 68, 33),
        juvenile: Rgb::new(130, 200, 80),
        mature: Rgb::new(1, 68, 33),
        bare: Rgb::new(1, 68, 33),
    },
    spring: SpringProgram::EvergreenFlush {
        flush: Rgb::new(130, 200, 80),
        start: 250.0,
        peak: 350.0,
        end: 600.0,
    },
    fall: FallProgram::None,
    freeze_color: Rgb::new(1, 55, 30),
    retention: LeafRetention::Evergreen,
    blend: BlendMode::Hsl,
};

pub const CHERRY_PLUM: SpeciesProfile = SpeciesProfile {
    symbol: "PRCE",
    alias: "cherry_plum",
    common_name: "Cherry Plum",
    scientific_name: "Prunus cerasifera",
    palette: Palette {
        dormant: Rgb::new(100, 80, 80),
        juvenile: Rgb::new(80, 20, 40),
        mature: Rgb::new(80, 20, 40),
        bare: Rgb::new(100, 60, 40),
    },
    spring: SpringProgram::SolidBloom {
        bloom: Rgb::new(255, 192, 203),
        start: 100.0,
        end: 250.0,
    },
    fall: FallProgram::Chill {
        onset: 100.0,
        span: 200.0,
    },
    freeze_color: Rgb::new(60, 40, 30),
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const SMOOTH_HAWTHORN: SpeciesProfile = SpeciesProfile {
    symbol: "CRLA80",
    alias: "smooth_hawthorn",
    common_name: "Smooth Hawthorn",
    scientific_name: "Crataegus laevigata",
    palette: Palette {
        dormant: Rgb::new(100, 90, 80),
        juvenile: Rgb::new(140, 160, 100),
        mature: Rgb::new(60, 120, 50),
        bare: BROWN,
    },
    spring: SpringProgram::LeafThenBloom {
        bloom: Rgb::new(250, 250, 240),
        leaf_start: 150.0,
        bloom_start: 250.0,
        bloom_peak: 300.0,
        bloom_end: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.5,
        peak_dl: 10.5,
        end_dl: 9.5,
        drought_advance: 1.0,
        peak: PeakColor::Fixed(Rgb::new(220, 180, 60)),
        late: Some(Rgb::new(200, 100, 40)),
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const CALLERY_PEAR: SpeciesProfile = SpeciesProfile {
    symbol: "PYCA80",
    alias: "callery_pear",
    common_name: "Callery Pear",
    scientific_name: "Pyrus calleryana",
    palette: Palette {
        dormant: Rgb::new(90, 80, 80),
        juvenile: Rgb::new(100, 160, 100),
        mature: Rgb::new(34, 139, 34),
        bare: BROWN,
    },
    spring: SpringProgram::BloomThenLeaf {
        bud: Rgb::new(240, 240, 230),
        bloom: Rgb::new(255, 255, 255),
        bud_swell_lead: None,
        bloom_start: 80.0,
        bloom_peak: 130.0,
        bloom_end: 180.0,
        leaf_start: 160.0,
        leaf_mature: 280.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.0,
        peak_dl: 10.0,
        end_dl: 9.0,
        drought_advance: 1.5,
        peak: PeakColor::Fixed(Rgb::new(128, 40, 60)),
        late: Some(Rgb::new(160, 20, 40)),
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const EUROPEAN_WHITE_BIRCH: SpeciesProfile = SpeciesProfile {
    symbol: "BEPE3",
    alias: "european_white_birch",
    common_name: "European White Birch",
    scientific_name: "Betula pendula",
    palette: Palette {
        dormant: Rgb::new(200, 200, 190),
        juvenile: Rgb::new(150, 220, 100),
        mature: Rgb::new(100, 180, 80),
        bare: Rgb::new(200, 200, 190),
    },
    spring: SpringProgram::LeafOut {
        start: 100.0,
        mature: 200.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 12.5,
        peak_dl: 11.5,
        end_dl: 10.5,
        drought_advance: 2.0,
        peak: PeakColor::Fixed(Rgb::new(240, 220, 20)),
        late: None,
    },
    freeze_color: Rgb::new(200, 200, 190),
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const JAPANESE_MAPLE: SpeciesProfile = SpeciesProfile {
    symbol: "ACPA2",
    alias: "japanese_maple",
    common_name: "Japanese Maple",
    scientific_name: "Acer palmatum",
    palette: Palette {
        dormant: Rgb::new(100, 100, 100),
        juvenile: Rgb::new(160, 60, 60),
        mature: Rgb::new(100, 40, 40),
        bare: BROWN,
    },
    spring: SpringProgram::LeafOut {
        start: 130.0,
        mature: 230.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.5,
        peak_dl: 10.5,
        end_dl: 9.5,
        drought_advance: 1.0,
        peak: PeakColor::UvBands {
            bands: &[(0.1, Rgb::new(220, 20, 60))],
            otherwise: Rgb::new(255, 69, 0),
        },
        late: None,
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const LITTLELEAF_LINDEN: SpeciesProfile = SpeciesProfile {
    symbol: "TICO2",
    alias: "littleleaf_linden",
    common_name: "Littleleaf Linden",
    scientific_name: "Tilia cordata",
    palette: Palette {
        dormant: Rgb::new(90, 80, 70),
        juvenile: Rgb::new(160, 220, 100),
        mature: Rgb::new(34, 139, 34),
        bare: BROWN,
    },
    spring: SpringProgram::LeafOut {
        start: 160.0,
        mature: 260.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.2,
        peak_dl: 10.2,
        end_dl: 9.2,
        drought_advance: 1.2,
        peak: PeakColor::Fixed(Rgb::new(240, 230, 140)),
        late: None,
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const JAPANESE_FLOWERING_CHERRY: SpeciesProfile = SpeciesProfile {
    symbol: "PRSE3",
    alias: "japanese_flowering_cherry",
    common_name: "Japanese Flowering Cherry",
    scientific_name: "Prunus serrulata",
    palette: Palette {
        dormant: Rgb::new(100, 80, 80),
        juvenile: Rgb::new(160, 120, 60),
        mature: Rgb::new(50, 100, 40),
        bare: Rgb::new(100, 80, 80),
    },
    spring: SpringProgram::BloomThenLeaf {
        bud: Rgb::new(180, 120, 120),
        bloom: Rgb::new(255, 190, 210),
        bud_swell_lead: Some(30.0),
        bloom_start: 120.0,
        bloom_peak: 160.0,
        bloom_end: 200.0,
        leaf_start: 180.0,
        leaf_mature: 300.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 12.0,
        peak_dl: 11.0,
        end_dl: 10.0,
        drought_advance: 1.0,
        peak: PeakColor::Fixed(Rgb::new(235, 140, 50)),
        late: Some(Rgb::new(205, 127, 50)),
    },
    freeze_color: Rgb::new(100, 80, 80),
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const HONEYLOCUST: SpeciesProfile = SpeciesProfile {
    symbol: "GLTR",
    alias: "honeylocust",
    common_name: "Honeylocust",
    scientific_name: "Gleditsia triacanthos",
    palette: Palette {
        dormant: Rgb::new(60, 50, 40),
        juvenile: Rgb::new(140, 180, 60),
        mature: Rgb::new(85, 107, 47),
        bare: Rgb::new(60, 50, 40),
    },
    spring: SpringProgram::LeafOut {
        start: 220.0,
        mature: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 12.0,
        peak_dl: 11.0,
        end_dl: 10.0,
        drought_advance: 1.5,
        peak: PeakColor::Fixed(Rgb::new(255, 215, 0)),
        late: None,
    },
    freeze_color: Rgb::new(60, 50, 40),
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const EUROPEAN_HORNBEAM: SpeciesProfile = SpeciesProfile {
    symbol: "CABE8",
    alias: "european_hornbeam",
    common_name: "European Hornbeam",
    scientific_name: "Carpinus betulus",
    palette: Palette {
        dormant: Rgb::new(90, 80, 70),
        juvenile: Rgb::new(120, 180, 100),
        mature: Rgb::new(34, 139, 34),
        bare: Rgb::new(160, 100, 60),
    },
    spring: SpringProgram::LeafOut {
        start: 150.0,
        mature: 250.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.5,
        peak_dl: 10.5,
        end_dl: 9.5,
        drought_advance: 1.2,
        peak: PeakColor::Fixed(Rgb::new(210, 180, 50)),
        late: None,
    },
    freeze_color: Rgb::new(160, 100, 60),
    retention: LeafRetention::Marcescent,
    blend: BlendMode::Hsl,
};

pub const FLOWERING_DOGWOOD: SpeciesProfile = SpeciesProfile {
    symbol: "COFL2",
    alias: "flowering_dogwood",
    common_name: "Flowering Dogwood",
    scientific_name: "Cornus florida",
    palette: Palette {
        dormant: Rgb::new(100, 90, 90),
        juvenile: Rgb::new(100, 160, 100),
        mature: Rgb::new(60, 100, 60),
        bare: BROWN,
    },
    spring: SpringProgram::BloomThenLeaf {
        bud: Rgb::new(180, 180, 170),
        bloom: Rgb::new(255, 250, 240),
        bud_swell_lead: None,
        bloom_start: 120.0,
        bloom_peak: 180.0,
        bloom_end: 250.0,
        leaf_start: 220.0,
        leaf_mature: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 11.2,
        peak_dl: 10.2,
        end_dl: 9.2,
        drought_advance: 1.5,
        peak: PeakColor::Fixed(Rgb::new(178, 34, 34)),
        late: Some(Rgb::new(100, 20, 20)),
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

pub const OREGON_ASH: SpeciesProfile = SpeciesProfile {
    symbol: "FRLA",
    alias: "oregon_ash",
    common_name: "Oregon Ash",
    scientific_name: "Fraxinus latifolia",
    palette: Palette {
        dormant: Rgb::new(110, 100, 90),
        juvenile: Rgb::new(140, 180, 80),
        mature: Rgb::new(85, 107, 47),
        bare: BROWN,
    },
    spring: SpringProgram::LeafOut {
        start: 250.0,
        mature: 350.0,
    },
    fall: FallProgram::Photoperiod {
        start_dl: 12.0,
        peak_dl: 11.0,
        end_dl: 10.0,
        drought_advance: 1.5,
        peak: PeakColor::Fixed(Rgb::new(255, 215, 0)),
        late: None,
    },
    freeze_color: BROWN,
    retention: LeafRetention::Deciduous,
    blend: BlendMode::Hsl,
};

/// Every built-in profile, in atlas row order.
pub fn builtin_profiles() -> Vec<SpeciesProfile> {
    vec![
        NORWAY_MAPLE,
        RED_MAPLE,
        SWEETGUM,
        RED_OAK,
        DOUGLAS_FIR,
        CHERRY_PLUM,
        SMOOTH_HAWTHORN,
        CALLERY_PEAR,
        EUROPEAN_WHITE_BIRCH,
        JAPANESE_MAPLE,
        LITTLELEAF_LINDEN,
        JAPANESE_FLOWERING_CHERRY,
        HONEYLOCUST,
        EUROPEAN_HORNBEAM,
        FLOWERING_DOGWOOD,
        OREGON_ASH,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::adjust_thresholds;

    #[test]
    fn test_builtin_symbols_are_unique() {
        let profiles = builtin_profiles();
        let mut symbols: Vec<&str> = profiles.iter().map(|p| p.symbol).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 16);
    }

    #[test]
    fn test_windows_are_ordered() {
        for profile in builtin_profiles() {
            assert!(
                profile.spring.wake() <= profile.spring.complete(),
                "{}",
                profile.symbol
            );
            if let FallProgram::Photoperiod {
                start_dl,
                peak_dl,
                end_dl,
                ..
            } = profile.fall
            {
                assert!(start_dl > peak_dl && peak_dl > end_dl, "{}", profile.symbol);
            }
        }
    }

    #[test]
    fn test_adjusted_scales_gdd_and_chill() {
        let urban = adjust_thresholds(true, 0.0);
        let adjusted = CHERRY_PLUM.adjusted(&urban);
        match adjusted.profile.spring {
            SpringProgram::SolidBloom { start, end, .. } => {
                assert!((start - 90.0).abs() < 1e-9);
                assert!((end - 225.0).abs() < 1e-9);
            }
            other => panic!("unexpected spring program {other:?}"),
        }
        match adjusted.profile.fall {
            FallProgram::Chill { onset, span } => {
                assert!((onset - 110.0).abs() < 1e-9);
                assert!((span - 220.0).abs() < 1e-9);
            }
            other => panic!("unexpected fall program {other:?}"),
        }
    }

    #[test]
    fn test_red_maple_shares_the_norway_maple_model() {
        assert_eq!(RED_MAPLE.palette, NORWAY_MAPLE.palette);
        assert_eq!(RED_MAPLE.spring, NORWAY_MAPLE.spring);
        assert_eq!(RED_MAPLE.fall, NORWAY_MAPLE.fall);
        assert_eq!(RED_MAPLE.blend, BlendMode::Hsl);
        assert_ne!(RED_MAPLE.symbol, NORWAY_MAPLE.symbol);
    }

    #[test]
    fn test_adjusted_leaves_day_length_alone() {
        let high = adjust_thresholds(false, 1500.0);
        let adjusted = NORWAY_MAPLE.adjusted(&high);
        assert_eq!(adjusted.profile.fall, NORWAY_MAPLE.fall);
        assert!(adjusted.profile.spring.wake() > NORWAY_MAPLE.spring.wake());
    }
}
