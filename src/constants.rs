/// Column and table names shared across the pipeline stages.

// Join key present in both input files
pub const ID_COLUMN: &str = "id";

// Packed `name-digit;name-digit;...` field in the categories file
pub const CATEGORIES_COLUMN: &str = "categories";

// Original-language text; sparsely populated, removed by the cleaner
pub const ORIGINAL_COLUMN: &str = "original";

// Destination table written by the writer stage
pub const DISASTER_TABLE: &str = "disaster_data";

pub const CATEGORY_DELIMITER: char = ';';

// Length of the `-0` / `-1` suffix on every category token
pub const CATEGORY_SUFFIX_LEN: usize = 2;

// Suffixes applied to non-key columns present in both inputs
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "etl.log";

pub const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. Example: disaster_etl \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";
