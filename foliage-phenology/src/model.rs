//! The shared phenology state machine.
//!
//! One pure function per day: dormant, optional bloom, leaf-out, summer,
//! fall, then bare (or held dry leaves). A recent hard freeze replaces the
//! color with the species' freeze color while the tree is in leaf or flower.

use crate::color::{calc_progress, Rgb};
use crate::normalize::DerivedDailyVariables;
use crate::species::{AdjustedProfile, FallProgram, LeafRetention, PeakColor, SpringProgram};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Dormant,
    Bloom,
    LeafOut,
    Summer,
    Fall,
    Bare,
    Marcescent,
    FreezeKilled,
}

impl Phase {
    /// Dormant and terminal phases ignore the freeze override.
    pub fn is_leafless(self) -> bool {
        matches!(self, Phase::Dormant | Phase::Bare | Phase::Marcescent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyState {
    pub phase: Phase,
    pub color: Rgb,
}

impl DailyState {
    fn new(phase: Phase, color: Rgb) -> Self {
        DailyState { phase, color }
    }
}

/// Color of a species on one day.
pub fn resolve_daily_color(row: &DerivedDailyVariables, adjusted: &AdjustedProfile) -> Rgb {
    resolve_daily_state(row, adjusted).color
}

/// Phase and color of a species on one day.
pub fn resolve_daily_state(row: &DerivedDailyVariables, adjusted: &AdjustedProfile) -> DailyState {
    let profile = &adjusted.profile;
    let state = match spring_state(row, adjusted) {
        Some(state) => state,
        None => fall_state(row, adjusted),
    };
    if row.recent_freeze
        && profile.retention != LeafRetention::Evergreen
        && !state.phase.is_leafless()
    {
        return DailyState::new(Phase::FreezeKilled, profile.freeze_color);
    }
    state
}

/// State while spring is still in progress; `None` once it is complete.
fn spring_state(row: &DerivedDailyVariables, adjusted: &AdjustedProfile) -> Option<DailyState> {
    let profile = &adjusted.profile;
    let palette = &profile.palette;
    let blend = profile.blend;
    let gdd = row.accumulated_gdd;

    if gdd >= profile.spring.complete() {
        return None;
    }

    let state = match profile.spring {
        SpringProgram::LeafOut { start, mature } => {
            if gdd < start {
                DailyState::new(Phase::Dormant, palette.dormant)
            } else {
                let p = calc_progress(gdd, start, mature);
                DailyState::new(Phase::LeafOut, blend.interp(palette.juvenile, palette.mature, p))
            }
        }
        SpringProgram::LeafOutViaJuvenile { start, mature } => {
            if gdd < start {
                DailyState::new(Phase::Dormant, palette.dormant)
            } else {
                let mid = (start + mature) / 2.0;
                let color = if gdd < mid {
                    blend.interp(palette.dormant, palette.juvenile, calc_progress(gdd, start, mid))
                } else {
                    blend.interp(palette.juvenile, palette.mature, calc_progress(gdd, mid, mature))
                };
                DailyState::new(Phase::LeafOut, color)
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
        } => {
            if gdd < bloom_start {
                let color = match bud_swell_lead {
                    Some(lead) if gdd > bloom_start - lead => blend.interp(
                        palette.dormant,
                        bud,
                        calc_progress(gdd, bloom_start - lead, bloom_start),
                    ),
                    _ => palette.dormant,
                };
                DailyState::new(Phase::Dormant, color)
            } else if gdd < bloom_end {
                let color = if gdd < bloom_peak {
                    blend.interp(bud, bloom, calc_progress(gdd, bloom_start, bloom_peak))
                } else {
                    blend.interp(bloom, palette.juvenile, calc_progress(gdd, bloom_peak, bloom_end))
                };
                DailyState::new(Phase::Bloom, color)
            } else {
                let p = calc_progress(gdd, leaf_start, leaf_mature);
                DailyState::new(Phase::LeafOut, blend.interp(palette.juvenile, palette.mature, p))
            }
        }
        SpringProgram::LeafThenBloom {
            bloom,
            leaf_start,
            bloom_start,
            bloom_peak,
            bloom_end,
        } => {
            if gdd < leaf_start {
                DailyState::new(Phase::Dormant, palette.dormant)
            } else if gdd < bloom_start {
                let p = calc_progress(gdd, leaf_start, bloom_start);
                DailyState::new(Phase::LeafOut, blend.interp(palette.juvenile, palette.mature, p))
            } else {
                let color = if gdd < bloom_peak {
                    blend.interp(palette.mature, bloom, calc_progress(gdd, bloom_start, bloom_peak))
                } else {
                    blend.interp(bloom, palette.mature, calc_progress(gdd, bloom_peak, bloom_end))
                };
                DailyState::new(Phase::Bloom, color)
            }
        }
        SpringProgram::SolidBloom { bloom, start, .. } => {
            if gdd < start {
                DailyState::new(Phase::Dormant, palette.dormant)
            } else {
                DailyState::new(Phase::Bloom, bloom)
            }
        }
        SpringProgram::EvergreenFlush {
            flush,
            start,
            peak,
            end,
        } => {
            if gdd < start {
                // Hard freezes dull the needles before the flush.
                let color = if row.recent_freeze {
                    profile.freeze_color
                } else {
                    palette.dormant
                };
                DailyState::new(Phase::Dormant, color)
            } else if gdd < peak {
                let p = calc_progress(gdd, start, peak);
                DailyState::new(Phase::LeafOut, blend.interp(palette.mature, flush, p))
            } else {
                let p = calc_progress(gdd, peak, end);
                DailyState::new(Phase::LeafOut, blend.interp(flush, palette.mature, p))
            }
        }
    };
    Some(state)
}

/// State once spring is complete: summer plateau, fall, or terminal.
fn fall_state(row: &DerivedDailyVariables, adjusted: &AdjustedProfile) -> DailyState {
    let profile = &adjusted.profile;
    let palette = &profile.palette;
    let blend = profile.blend;
    let summer = DailyState::new(Phase::Summer, palette.mature);
    let terminal = match profile.retention {
        LeafRetention::Marcescent => DailyState::new(Phase::Marcescent, palette.bare),
        LeafRetention::Deciduous | LeafRetention::Evergreen => {
            DailyState::new(Phase::Bare, palette.bare)
        }
    };

    match profile.fall {
        FallProgram::None => summer,
        FallProgram::Photoperiod {
            start_dl,
            peak_dl,
            end_dl,
            drought_advance,
            peak,
            late,
        } => {
            let dl = row.day_length_hours;
            let fall_start_dl = start_dl + row.drought_stress * drought_advance;
            if dl > fall_start_dl {
                return summer;
            }
            let peak_color = select_peak(peak, row, adjusted);
            if dl > peak_dl {
                let p = calc_progress(fall_start_dl - dl, 0.0, fall_start_dl - peak_dl);
                DailyState::new(Phase::Fall, blend.interp(palette.mature, peak_color, p))
            } else if dl > end_dl {
                let p = calc_progress(peak_dl - dl, 0.0, peak_dl - end_dl);
                let late_color = late.unwrap_or(palette.bare);
                DailyState::new(Phase::Fall, blend.interp(peak_color, late_color, p))
            } else {
                terminal
            }
        }
        FallProgram::Chill { onset, span } => {
            if !row.is_fall_season || row.accumulated_chill < onset {
                return summer;
            }
            let p = calc_progress(row.accumulated_chill, onset, onset + span);
            if p >= 1.0 {
                terminal
            } else {
                DailyState::new(Phase::Fall, blend.interp(palette.mature, palette.bare, p))
            }
        }
        FallProgram::Calendar {
            start_doy,
            peak_doy,
            end_doy,
            peak,
        } => {
            let doy = row.day_of_year as f64;
            if doy < start_doy {
                return summer;
            }
            let peak_color = select_peak(peak, row, adjusted);
            if doy < peak_doy {
                let p = calc_progress(doy, start_doy, peak_doy);
                DailyState::new(Phase::Fall, blend.interp(palette.mature, peak_color, p))
            } else if doy < end_doy {
                let p = calc_progress(doy, peak_doy, end_doy);
                DailyState::new(Phase::Fall, blend.interp(peak_color, palette.bare, p))
            } else {
                terminal
            }
        }
    }
}

fn select_peak(peak: PeakColor, row: &DerivedDailyVariables, adjusted: &AdjustedProfile) -> Rgb {
    let uv = row.uv_stress_factor;
    match peak {
        PeakColor::Fixed(color) => color,
        PeakColor::UvBands { bands, otherwise } => bands
            .iter()
            .find(|(min_uv, _)| uv > *min_uv)
            .map(|(_, color)| *color)
            .unwrap_or(otherwise),
        PeakColor::UvBlend {
            base,
            toward,
            min_uv,
        } => {
            if uv > min_uv {
                adjusted.profile.blend.interp(base, toward, uv)
            } else {
                base
            }
        }
        PeakColor::Drought { vivid, muted } => {
            if row.severe_drought {
                muted
            } else {
                vivid
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::species::*;
    use crate::thresholds::LocationModifiers;
    use chrono::{Datelike, NaiveDate};

    /// A derived row with neutral stress flags, for driving the state machine directly.
    pub(crate) fn row(doy: u32, gdd: f64, day_length: f64) -> DerivedDailyVariables {
        let date = NaiveDate::from_yo_opt(2023, doy).unwrap();
        DerivedDailyVariables {
            date,
            day_of_year: date.ordinal(),
            day_length_hours: day_length,
            photoperiod_live: true,
            max_temp: 20.0,
            min_temp: 10.0,
            mean_temp: 15.0,
            daily_gdd: 5.0,
            accumulated_gdd: gdd,
            is_fall_season: doy > 266,
            daily_chill: 0.0,
            accumulated_chill: 0.0,
            is_freeze_day: false,
            recent_freeze: false,
            rolling_soil_moisture: 0.3,
            drought_stress: 0.0,
            severe_drought: false,
            uv_stress_factor: 0.0,
        }
    }

    fn rural(profile: &SpeciesProfile) -> AdjustedProfile {
        profile.adjusted(&LocationModifiers::default())
    }

    /// Fixed day-of-year fall window with a flat RGB blend.
    const CALENDAR_MAPLE: SpeciesProfile = SpeciesProfile {
        symbol: "CALMAPLE",
        alias: "calendar_maple",
        common_name: "Calendar Maple",
        scientific_name: "Acer",
        palette: Palette {
            dormant: Rgb::new(110, 100, 90),
            juvenile: Rgb::new(160, 200, 100),
            mature: Rgb::new(34, 139, 34),
            bare: Rgb::new(139, 69, 19),
        },
        spring: SpringProgram::LeafOut {
            start: 200.0,
            mature: 300.0,
        },
        fall: FallProgram::Calendar {
            start_doy: 265.0,
            peak_doy: 290.0,
            end_doy: 315.0,
            peak: PeakColor::Drought {
                vivid: Rgb::new(220, 20, 60),
                muted: Rgb::new(160, 110, 60),
            },
        },
        freeze_color: Rgb::new(139, 69, 19),
        retention: LeafRetention::Deciduous,
        blend: crate::color::BlendMode::Rgb,
    };

    #[test]
    fn test_calendar_window() {
        let maple = rural(&CALENDAR_MAPLE);
        let green = Rgb::new(34, 139, 34);
        let red = Rgb::new(220, 20, 60);
        let brown = Rgb::new(139, 69, 19);

        assert_eq!(resolve_daily_color(&row(100, 2000.0, 13.0), &maple), green);
        assert_eq!(resolve_daily_color(&row(290, 2000.0, 10.8), &maple), red);
        assert_eq!(resolve_daily_color(&row(350, 2000.0, 8.5), &maple), brown);

        let between = resolve_daily_color(&row(277, 2000.0, 11.4), &maple);
        assert!(between.r > green.r && between.r < red.r, "{between}");
        assert!(between.g < green.g && between.g > red.g, "{between}");
        assert!(between.b > green.b && between.b < red.b, "{between}");
    }

    #[test]
    fn test_calendar_peak_mutes_under_severe_drought() {
        let maple = rural(&CALENDAR_MAPLE);
        let mut dry = row(290, 2000.0, 10.8);
        dry.severe_drought = true;
        assert_eq!(resolve_daily_color(&dry, &maple), Rgb::new(160, 110, 60));
    }

    #[test]
    fn test_norway_maple_season_walk() {
        let maple = rural(&NORWAY_MAPLE);
        let state = |r: DerivedDailyVariables| resolve_daily_state(&r, &maple);

        assert_eq!(state(row(60, 20.0, 11.0)).phase, Phase::Dormant);
        assert_eq!(state(row(60, 20.0, 11.0)).color, NORWAY_MAPLE.palette.dormant);
        assert_eq!(state(row(120, 250.0, 14.0)).phase, Phase::LeafOut);
        // Summer holds while days stay longer than the fall start threshold.
        assert_eq!(state(row(170, 900.0, 16.0)).phase, Phase::Summer);
        assert_eq!(state(row(250, 1500.0, 12.8)).phase, Phase::Summer);
        assert_eq!(state(row(280, 1600.0, 11.2)).phase, Phase::Summer);
        let fall = state(row(290, 1600.0, 10.5));
        assert_eq!(fall.phase, Phase::Fall);
        assert_eq!(state(row(340, 1600.0, 8.6)).phase, Phase::Bare);
        assert_eq!(state(row(340, 1600.0, 8.6)).color, NORWAY_MAPLE.palette.bare);
    }

    #[test]
    fn test_short_days_after_leaf_out_start_fall() {
        // Fall follows day length alone, whichever side of the solstice.
        let maple = rural(&NORWAY_MAPLE);
        let state = resolve_daily_state(&row(120, 400.0, 10.5), &maple);
        assert_eq!(state.phase, Phase::Fall);
    }

    #[test]
    fn test_fall_peak_is_exact_at_peak_day_length() {
        let oak = rural(&RED_OAK);
        let color = resolve_daily_color(&row(300, 2000.0, 10.5), &oak);
        assert_eq!(color, Rgb::new(165, 42, 42));
    }

    #[test]
    fn test_drought_advances_photoperiod_fall() {
        let birch = rural(&EUROPEAN_WHITE_BIRCH);
        let mut wet = row(230, 1500.0, 13.5);
        assert_eq!(resolve_daily_state(&wet, &birch).phase, Phase::Summer);
        wet.drought_stress = 1.0;
        assert_eq!(resolve_daily_state(&wet, &birch).phase, Phase::Fall);
    }

    #[test]
    fn test_marcescent_species_hold_dry_leaves() {
        let oak = rural(&RED_OAK);
        let state = resolve_daily_state(&row(350, 2000.0, 8.5), &oak);
        assert_eq!(state.phase, Phase::Marcescent);
        assert_eq!(state.color, Rgb::new(139, 69, 19));
    }

    #[test]
    fn test_freeze_override() {
        let maple = rural(&NORWAY_MAPLE);
        let mut frozen = row(300, 1600.0, 10.5);
        frozen.recent_freeze = true;
        let state = resolve_daily_state(&frozen, &maple);
        assert_eq!(state.phase, Phase::FreezeKilled);
        assert_eq!(state.color, NORWAY_MAPLE.freeze_color);

        // No-op while dormant or bare.
        let mut dormant = row(30, 5.0, 9.0);
        dormant.recent_freeze = true;
        assert_eq!(resolve_daily_state(&dormant, &maple).phase, Phase::Dormant);
        let mut bare = row(350, 1600.0, 8.5);
        bare.recent_freeze = true;
        assert_eq!(resolve_daily_state(&bare, &maple).phase, Phase::Bare);

        // Evergreens keep their needles.
        let fir = rural(&DOUGLAS_FIR);
        assert_eq!(resolve_daily_state(&frozen, &fir).color, DOUGLAS_FIR.palette.mature);
    }

    #[test]
    fn test_douglas_fir_dulls_in_winter_freeze() {
        let fir = rural(&DOUGLAS_FIR);
        let mut winter = row(20, 10.0, 8.7);
        assert_eq!(resolve_daily_color(&winter, &fir), DOUGLAS_FIR.palette.dormant);
        winter.recent_freeze = true;
        let state = resolve_daily_state(&winter, &fir);
        assert_eq!(state.phase, Phase::Dormant);
        assert_eq!(state.color, Rgb::new(1, 55, 30));
    }

    #[test]
    fn test_cherry_bud_swell_and_bloom() {
        let cherry = rural(&JAPANESE_FLOWERING_CHERRY);
        let palette = JAPANESE_FLOWERING_CHERRY.palette;
        assert_eq!(resolve_daily_color(&row(60, 50.0, 11.0), &cherry), palette.dormant);
        let swelling = resolve_daily_state(&row(70, 105.0, 11.5), &cherry);
        assert_eq!(swelling.phase, Phase::Dormant);
        assert_ne!(swelling.color, palette.dormant);
        let peak = resolve_daily_state(&row(80, 160.0, 12.0), &cherry);
        assert_eq!(peak.phase, Phase::Bloom);
        assert_eq!(peak.color, Rgb::new(255, 190, 210));
        assert_eq!(
            resolve_daily_state(&row(95, 250.0, 12.5), &cherry).phase,
            Phase::LeafOut
        );
    }

    #[test]
    fn test_hawthorn_blooms_over_foliage() {
        let hawthorn = rural(&SMOOTH_HAWTHORN);
        assert_eq!(
            resolve_daily_state(&row(90, 200.0, 12.5), &hawthorn).phase,
            Phase::LeafOut
        );
        let bloom = resolve_daily_state(&row(110, 300.0, 13.5), &hawthorn);
        assert_eq!(bloom.phase, Phase::Bloom);
        assert_eq!(bloom.color, Rgb::new(250, 250, 240));
    }

    #[test]
    fn test_cherry_plum_chill_fall() {
        let plum = rural(&CHERRY_PLUM);
        assert_eq!(
            resolve_daily_color(&row(80, 150.0, 12.0), &plum),
            Rgb::new(255, 192, 203)
        );
        let mut fall = row(300, 1500.0, 10.0);
        fall.accumulated_chill = 50.0;
        assert_eq!(resolve_daily_state(&fall, &plum).phase, Phase::Summer);
        fall.accumulated_chill = 200.0;
        assert_eq!(resolve_daily_state(&fall, &plum).phase, Phase::Fall);
        fall.accumulated_chill = 400.0;
        let bare = resolve_daily_state(&fall, &plum);
        assert_eq!(bare.phase, Phase::Bare);
        assert_eq!(bare.color, Rgb::new(100, 60, 40));
    }

    #[test]
    fn test_douglas_fir_flush_and_no_fall() {
        let fir = rural(&DOUGLAS_FIR);
        assert_eq!(
            resolve_daily_color(&row(140, 350.0, 15.0), &fir),
            Rgb::new(130, 200, 80)
        );
        assert_eq!(
            resolve_daily_state(&row(340, 2000.0, 8.5), &fir).phase,
            Phase::Summer
        );
    }

    #[test]
    fn test_uv_peak_selection() {
        let sweetgum = rural(&SWEETGUM);
        let mut r = row(300, 2000.0, 10.0);
        assert_eq!(resolve_daily_color(&r, &sweetgum), Rgb::new(240, 200, 50));
        r.uv_stress_factor = 0.3;
        assert_eq!(resolve_daily_color(&r, &sweetgum), Rgb::new(220, 20, 60));
        r.uv_stress_factor = 0.8;
        assert_eq!(resolve_daily_color(&r, &sweetgum), Rgb::new(75, 0, 130));

        let maple = rural(&NORWAY_MAPLE);
        let mut low = row(300, 2000.0, 10.0);
        assert_eq!(resolve_daily_color(&low, &maple), Rgb::new(240, 190, 40));
        low.uv_stress_factor = 1.0;
        assert_eq!(resolve_daily_color(&low, &maple), Rgb::new(220, 140, 20));
    }

    #[test]
    fn test_urban_trees_leaf_out_sooner() {
        let urban = NORWAY_MAPLE.adjusted(&crate::thresholds::adjust_thresholds(true, 0.0));
        let rural_maple = rural(&NORWAY_MAPLE);
        let r = row(110, 190.0, 13.5);
        assert_eq!(resolve_daily_state(&r, &rural_maple).phase, Phase::Dormant);
        assert_eq!(resolve_daily_state(&r, &urban).phase, Phase::LeafOut);
    }
}
