//! Species profile catalog.
//!
//! Read-only presets: one row per supported species plus the synthetic
//! `Custom` row. Temperature ranges are °F, humidity is %RH. The Custom
//! row exists so its id resolves like any other; its numeric fields are
//! never consulted — custom values live in the process state instead.

/// Biological defaults for one species.
#[derive(Debug, Clone, Copy)]
pub struct EggProfile {
    pub id: u8,
    pub name: &'static str,

    // === Incubation ===
    pub inc_temp_min_f: f32,
    pub inc_temp_max_f: f32,
    pub inc_hum_min: f32,
    pub inc_hum_max: f32,
    pub inc_total_days: u16,
    pub inc_turns_per_day: u8,

    // === Holding / preservation ===
    pub hold_temp_min_f: f32,
    pub hold_temp_max_f: f32,
    pub hold_hum_min: f32,
    pub hold_hum_max: f32,
    pub hold_max_days: u16,
    pub hold_turns_per_day: u8,
}

/// Id of the default profile (Chicken).
pub const DEFAULT_PROFILE_ID: u8 = 0;
/// Sentinel id of the synthetic Custom profile.
pub const CUSTOM_PROFILE_ID: u8 = 38;

macro_rules! profile {
    ($id:expr, $name:expr,
     $imin:expr, $imax:expr, $ihmin:expr, $ihmax:expr, $idays:expr, $iturns:expr,
     $hmin:expr, $hmax:expr, $hhmin:expr, $hhmax:expr, $hdays:expr, $hturns:expr) => {
        EggProfile {
            id: $id,
            name: $name,
            inc_temp_min_f: $imin,
            inc_temp_max_f: $imax,
            inc_hum_min: $ihmin,
            inc_hum_max: $ihmax,
            inc_total_days: $idays,
            inc_turns_per_day: $iturns,
            hold_temp_min_f: $hmin,
            hold_temp_max_f: $hmax,
            hold_hum_min: $hhmin,
            hold_hum_max: $hhmax,
            hold_max_days: $hdays,
            hold_turns_per_day: $hturns,
        }
    };
}

/// The full catalog, indexed by id.
pub static EGG_PROFILES: [EggProfile; 39] = [
    profile!(0, "Chicken", 98.0, 100.5, 45.0, 55.0, 21, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(1, "Cockatiel", 99.5, 100.0, 45.0, 55.0, 18, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(2, "Cormorant", 99.0, 99.5, 50.0, 60.0, 28, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(3, "Crane", 99.0, 99.5, 50.0, 60.0, 30, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(4, "Duck", 99.5, 100.0, 50.0, 60.0, 28, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(5, "Duck Muscovy", 99.0, 99.5, 50.0, 60.0, 35, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(6, "Eagle", 99.0, 99.5, 45.0, 55.0, 35, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(7, "Emu", 96.5, 97.5, 40.0, 50.0, 50, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(8, "Falcon", 99.0, 99.5, 45.0, 55.0, 32, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(9, "Flamingo", 99.0, 99.5, 50.0, 60.0, 28, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(10, "Goose", 99.0, 99.5, 50.0, 60.0, 30, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(11, "Grouse", 99.5, 100.0, 45.0, 55.0, 24, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(12, "Guinea Fowl", 99.5, 100.0, 45.0, 55.0, 26, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(13, "Hawk", 99.0, 99.5, 45.0, 55.0, 32, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(14, "Heron", 99.0, 99.5, 50.0, 60.0, 28, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(15, "Hummingbird", 99.5, 100.0, 45.0, 55.0, 14, 4, 55.0, 65.0, 70.0, 80.0, 7, 2),
    profile!(16, "Large Parrots", 99.0, 99.5, 45.0, 55.0, 26, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(17, "Lovebird", 99.5, 100.0, 45.0, 55.0, 23, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(18, "Ostrich", 96.0, 97.0, 40.0, 50.0, 42, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(19, "Owl", 99.0, 99.5, 45.0, 55.0, 30, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(20, "Parakeet", 99.5, 100.0, 45.0, 55.0, 18, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(21, "Parrots", 99.5, 100.0, 45.0, 55.0, 26, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(22, "Partridge", 99.5, 100.0, 45.0, 55.0, 24, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(23, "Peacock", 99.5, 100.0, 45.0, 55.0, 28, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(24, "Pelican", 99.0, 99.5, 50.0, 60.0, 30, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(25, "Penguin", 98.5, 99.5, 50.0, 60.0, 35, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(26, "Pheasant", 99.5, 100.0, 45.0, 55.0, 24, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(27, "Pigeon", 99.5, 100.0, 45.0, 55.0, 18, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(28, "Quail", 99.5, 100.5, 45.0, 55.0, 17, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(29, "Rail", 99.0, 99.5, 50.0, 60.0, 20, 3, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(30, "Rhea", 97.0, 98.0, 40.0, 50.0, 40, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(31, "Seabirds", 99.0, 99.5, 50.0, 60.0, 28, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(32, "Songbirds", 99.5, 100.0, 45.0, 55.0, 14, 4, 55.0, 65.0, 70.0, 80.0, 7, 2),
    profile!(33, "Stork", 99.0, 99.5, 50.0, 60.0, 30, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(34, "Swan", 99.0, 99.5, 50.0, 60.0, 35, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(35, "Toucan", 99.0, 99.5, 45.0, 55.0, 18, 4, 55.0, 65.0, 70.0, 80.0, 10, 2),
    profile!(36, "Turkey", 99.0, 100.0, 50.0, 60.0, 28, 4, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(37, "Vulture", 99.0, 99.5, 45.0, 55.0, 42, 3, 55.0, 65.0, 70.0, 80.0, 14, 2),
    profile!(
        38,
        "Custom",
        f32::NAN,
        f32::NAN,
        f32::NAN,
        f32::NAN,
        0,
        0,
        f32::NAN,
        f32::NAN,
        f32::NAN,
        f32::NAN,
        0,
        0
    ),
];

/// Look a profile up by id. `None` for out-of-range ids — callers treat
/// that as a recoverable condition, never a fatal one.
pub fn profile_by_id(id: u8) -> Option<&'static EggProfile> {
    EGG_PROFILES.iter().find(|p| p.id == id)
}
