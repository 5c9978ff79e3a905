use thiserror::Error;

/// Errors raised while resolving and persisting a single import row, plus the
/// run-fatal initialisation failures.
///
/// Row-level variants are always caught at the transaction boundary and routed
/// to the error sink; they never abort a run. `RankLadderLoad` and
/// `StagingFailed` are raised before any row is processed and propagate to the
/// caller.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No mapping targets any recognised category.
    #[error("row has no recognisable mapped data")]
    NoMappedCategories,

    /// A field failed type coercion and the caller required a valid value.
    #[error("invalid value for {field}: \"{value}\" ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A field that must be numeric did not parse.
    #[error("expected a numeric value for {field}, got \"{value}\"")]
    NotNumeric { field: String, value: String },

    /// Numeric coordinates outside latitude/longitude range with no UTM
    /// zone/ellipsoid mapped to reinterpret them.
    #[error(
        "no UTM zone and/or ellipsoid provided, but {x_field}/{y_field} are outside the latitude/longitude range"
    )]
    CoordinatesOutOfRange { x_field: String, y_field: String },

    /// An explicitly mapped coordinate type was not 0, 1 or 2.
    #[error("unrecognised coordinate type: {value}")]
    UnknownCoordinateType { value: i32 },

    /// An explicitly mapped position area type was not point, line or box.
    #[error("unrecognised position area type: {value}")]
    UnknownPositionType { value: i32 },

    /// A latitude/longitude pair could not be read as decimal degrees or as
    /// degree-minute-second text.
    #[error("could not read {x_field}/{y_field} as coordinates: {reason}")]
    BadCoordinatePair {
        x_field: String,
        y_field: String,
        reason: String,
    },

    /// UTM easting/northing values must be plain numbers.
    #[error("easting and/or northing value in {x_field}/{y_field} is not numeric")]
    NonNumericEastingNorthing { x_field: String, y_field: String },

    /// UTM coordinates were mapped without a grid zone.
    #[error("a grid zone must be provided for UTM coordinates (zone number + latitude band letter)")]
    MissingUtmZone,

    /// The UTM grid zone string did not parse.
    #[error("invalid UTM grid zone \"{zone}\": {reason}")]
    InvalidUtmZone { zone: String, reason: String },

    /// The UTM ellipsoid name is not in the ellipsoid table.
    #[error("unrecognised ellipsoid name: {name}")]
    UnknownEllipsoid { name: String },

    /// A fixed-format start date was paired with an end date that is not.
    #[error("invalid end date \"{value}\": start date is in fixed format, end date is not")]
    MixedDateFormats { value: String },

    /// A date field was neither a compact date nor a recognisable calendar date.
    #[error("'{field}' value ({value}) is not a valid date: {reason}")]
    InvalidDate {
        field: String,
        value: String,
        reason: String,
    },

    /// The persistence layer rejected an insert; fatal to the row.
    #[error("store rejected {operation}: {reason}")]
    Store { operation: String, reason: String },

    /// Run-fatal: the taxonomic rank ladder could not be loaded.
    #[error("failed to load taxonomic rank ladder: {reason}")]
    RankLadderLoad { reason: String },

    /// Run-fatal: the staged row source could not be prepared.
    #[error("failed to prepare staged rows: {reason}")]
    StagingFailed { reason: String },
}

impl ImportError {
    /// True for errors that abort the whole run instead of a single row.
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::RankLadderLoad { .. } | ImportError::StagingFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
