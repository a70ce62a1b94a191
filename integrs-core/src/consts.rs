/// Maximal distance (bp) between two consecutive attC sites of one array,
/// and between an array and its integrase.
pub const DEFAULT_DISTANCE_THRESHOLD: u32 = 4000;
pub const DEFAULT_MAX_ATTC_SIZE: u32 = 200;
pub const DEFAULT_MIN_ATTC_SIZE: u32 = 40;
pub const DEFAULT_EVALUE_ATTC: f64 = 1.0;

pub const DEFAULT_ATTC_MODEL: &str = "attc_4";
/// Profile specific to integron integrases.
pub const DEFAULT_INTEGRASE_MODEL: &str = "intI_Cterm";
/// Broad tyrosine-recombinase profile.
pub const DEFAULT_RECOMBINASE_MODEL: &str = "Phage_integrase";
pub const DEFAULT_CMSEARCH_BIN: &str = "cmsearch";
