//! Wire-stable names the VM loader looks up.

// Synthetic annotations attached to functions.
pub const EXPECTED_PROPERTY_COUNT_ANNOTATION: &str = "_ESExpectedPropertyCountAnnotation";
pub const EXPECTED_PROPERTY_COUNT_ELEMENT: &str = "ExpectedPropertyCount";
pub const SLOT_NUMBER_ANNOTATION: &str = "_ESSlotNumberAnnotation";
pub const SLOT_NUMBER_ELEMENT: &str = "SlotNumber";
pub const CONCURRENT_MODULE_REQUESTS_ANNOTATION: &str = "_ESConcurrentModuleRequestsAnnotation";
pub const CONCURRENT_MODULE_REQUEST_ELEMENT: &str = "ConcurrentModuleRequest";

// Fields of the per-file record (merged mode).
pub const PKG_NAME_FIELD_PREFIX: &str = "pkgName@";
pub const IS_COMMONJS_FIELD: &str = "isCommonjs";
pub const HAS_TOP_LEVEL_AWAIT_FIELD: &str = "hasTopLevelAwait";
pub const IS_SHARED_MODULE_FIELD: &str = "isSharedModule";
pub const SCOPE_NAMES_FIELD: &str = "scopeNames";
pub const MODULE_RECORD_IDX_FIELD: &str = "moduleRecordIdx";
pub const MODULE_REQUEST_PHASE_IDX_FIELD: &str = "moduleRequestPhaseIdx";
pub const JSON_FILE_CONTENT_FIELD: &str = "jsonFileContent";

// Free-standing records (standalone mode).
pub const COMMONJS_RECORD: &str = "_CommonJsRecord";
pub const COMMONJS_RECORD_FIELD: &str = "isCommonJs";
pub const HAS_TOP_LEVEL_AWAIT_RECORD: &str = "_HasTopLevelAwait";
pub const SHARED_MODULE_RECORD: &str = "_SharedModuleRecord";
pub const SCOPE_NAMES_RECORD: &str = "_ESScopeNamesRecord";
pub const MODULE_RECORD: &str = "_ESModuleRecord";
pub const MODULE_REQUEST_PHASE_RECORD: &str = "_ModuleRequestPhaseRecord";

/// External record standing in for the string class in annotation fields.
pub const STRING_CLASS_RECORD: &str = "pando.String";

/// Source text recorded for the top-level function when the source is not
/// embedded.
pub const SOURCE_NOT_SUPPORTED: &str = "not supported";

/// Signature and signature type of every local-variable record.
pub const LOCAL_VARIABLE_SIGNATURE: &str = "any";
