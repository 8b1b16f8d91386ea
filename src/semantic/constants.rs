// Constants for the C-minus front end

/// Storage width of an `int`, in bytes
pub const INT_WIDTH: usize = 4;

/// Storage width of an address; array parameters are passed by address
pub const ADDRESS_WIDTH: usize = 4;

/// Prefix of compiler-generated temporaries (`_v0`, `_v1`, ...)
pub const TEMP_PREFIX: &str = "_v";

/// Prefix of compiler-generated block labels (`__b0`, `__b1`, ...)
pub const LABEL_PREFIX: &str = "__b";

/// Name a call's return value is read from
pub const RESULT_NAME: &str = "result";
