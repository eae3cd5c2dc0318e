// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.mynetdiary.com";
pub const LOGON_PATH: &str = "/logon.do";
pub const DAILY_PATH: &str = "/daily.do";
pub const DAILY_DETAILS_PATH: &str = "/dailyDetails.do";
pub const FOOD_SAVE_PATH: &str = "/dailyFoodSave.do";
pub const FIND_FOODS_PATH: &str = "/findFoods.do";
pub const CUSTOM_FOOD_PATH: &str = "/customFoodUpdate.do";
pub const RETIRE_FOOD_PATH: &str = "/retireUserFood.do";
pub const REPORT_PATH: &str = "/reportRefresh.do";

pub const MFP_BASE_URL: &str = "http://www.myfitnesspal.com";
pub const MFP_SEARCH_PATH: &str = "/food/search";

pub const USER_AGENT: &str = concat!("foodcli/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Page-embedded script variables
pub const FOOD_GRID_VAR: &str = "initialFoodGridPM";
pub const MEASUREMENTS_VAR: &str = "measurementsPM";

// Food search
pub const SEARCH_PAGE_SIZE: u32 = 100;
pub const SEARCH_OK_MARKER: &str = "OK";
pub const SEARCH_PREFIX_LEN: usize = 11; // "OK `+`json" plus separator

// Day grid mutation
pub const MEAL_TYPE_ID: u32 = 1;
pub const ENTRY_BAND_PREFIX: u32 = 100; // "1" followed by a two-digit sequence
pub const ENTRY_SEQ_FIRST: u32 = 1;
pub const ENTRY_SEQ_LAST: u32 = 99;

// Weight history
pub const WEIGHT_MEASUREMENT_ID: i64 = 40;
pub const WEIGHT_SUFFIX: &str = "kg";

// Energy accounting (kcal per gram)
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const FIBER_KCAL_PER_G: f64 = 2.0;

// Nutrient labels as the diary grid names them
pub const LABEL_CALORIES: &str = "Cals";
pub const LABEL_PROTEIN: &str = "Protein";
pub const LABEL_FIBER: &str = "Fiber";
pub const LABEL_CARBS: &str = "Carbs";
pub const LABEL_FAT: &str = "Fat";

// Report export
pub const REPORT_FIXED_HEADERS: [&str; 4] = ["date", "food", "serving", "amount"];
pub const REPORT_SUM_LABEL: &str = "DAILY_SUM";
pub const REPORT_PERCENT_LABEL: &str = "DAILY_PERCENT";

// Local files
pub const CONFIG_DIR_NAME: &str = "foodcli";
pub const CREDENTIALS_FILE: &str = "credentials.yaml";
pub const DEFAULT_WEIGHTS_FILE: &str = "output.csv";
pub const DEFAULT_NUTRITION_FILE: &str = "nutrition.csv";
pub const DEFAULT_HISTORY_START: &str = "2012-01-01";
pub const PARTIAL_SUFFIX: &str = "partial";
pub const CSV_SEP: char = ',';
