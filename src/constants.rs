// Constants module - fixed names and endpoints shared by URL assembly and signing

// =============================================================================
// CDN endpoints
// =============================================================================

/// Base for project + path addressed URLs
pub const PROJECT_BASE_URL: &str = "https://cdn.flyyer.io/v2";

/// Base for tenant/deck/template addressed URLs
pub const RENDER_BASE_URL: &str = "https://cdn.flyyer.io/render/v2";

/// Prefix of the path segment carrying a project token
pub const JWT_SEGMENT_PREFIX: &str = "jwt-";

/// Default request path when none is configured
pub const DEFAULT_PATH: &str = "/";

// =============================================================================
// Signing
// =============================================================================

/// Path segment used in place of a signature when signing is disabled
pub const UNSIGNED_PLACEHOLDER: &str = "_";

/// Number of hex characters kept from the HMAC-SHA256 digest
pub const HMAC_DIGEST_HEX_LEN: usize = 16;

/// Separator between routing fields in the render HMAC input
pub const RENDER_SIGNING_SEPARATOR: &str = "#";

// =============================================================================
// Parameter names
// =============================================================================

/// Cache-busting version
pub const PARAM_CACHE_BUSTER: &str = "__v";

/// Stable identifier
pub const PARAM_ID: &str = "__id";

/// Width in pixels
pub const PARAM_WIDTH: &str = "_w";

/// Height in pixels
pub const PARAM_HEIGHT: &str = "_h";

/// Resolution (device pixel ratio)
pub const PARAM_RESOLUTION: &str = "_res";

/// User agent tag
pub const PARAM_AGENT: &str = "_ua";

/// Fallback image
pub const PARAM_DEFAULT_IMAGE: &str = "_def";

/// HMAC digest appended to render queries
pub const PARAM_HMAC: &str = "__hmac";

/// Token carried by render queries in JWT mode
pub const PARAM_JWT: &str = "__jwt";

// =============================================================================
// Configuration
// =============================================================================

/// Default config file looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "flyyer.yaml";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
