// Shared
pub const BERSERKING: u64 = 26297;
pub const BLOOD_FURY_PHYSICAL: u64 = 20572;
pub const BLOOD_FURY_SPELL: u64 = 33702;
pub const BLOOD_FURY_HYBRID: u64 = 33697;
pub const POTION_OF_PROLONGED_POWER: u64 = 229206;
pub const POTION_OF_DEADLY_GRACE: u64 = 188027;

// Warlock
pub const SOUL_HARVEST: u64 = 196098;
pub const SUMMON_INFERNAL: u64 = 1122;
pub const SUMMON_DOOMGUARD: u64 = 18540;
pub const GRIMOIRE_IMP: u64 = 111859;
pub const GRIMOIRE_VOIDWALKER: u64 = 111895;
pub const GRIMOIRE_SUCCUBUS: u64 = 111896;
pub const GRIMOIRE_FELHUNTER: u64 = 111897;
pub const AGONY: u64 = 980;

// Druid (Balance)
pub const CELESTIAL_ALIGNMENT: u64 = 194223;
pub const INCARNATION_CHOSEN_OF_ELUNE: u64 = 102560;
