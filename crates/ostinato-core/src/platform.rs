//! Virtual package name classification.
//!
//! Certain names in the Composer ecosystem never resolve to installable
//! packages: the PHP runtime itself, PHP extensions, system libraries,
//! polyfills satisfied by the runtime, and the Composer runtime APIs. The
//! resolver drops these from the resolution frontier without contacting the
//! registry.

/// Check whether a package name is virtual (never resolved or installed).
///
/// # Examples
///
/// ```
/// use ostinato_core::is_virtual_name;
///
/// assert!(is_virtual_name("php"));
/// assert!(is_virtual_name("ext-mbstring"));
/// assert!(is_virtual_name("symfony/polyfill-php80"));
/// assert!(!is_virtual_name("monolog/monolog"));
/// ```
#[must_use]
pub fn is_virtual_name(name: &str) -> bool {
    name == "php"
        || name.starts_with("ext-")
        || name.starts_with("lib-")
        || name.starts_with("symfony/polyfill-")
        || name == "composer-runtime-api"
        || name == "composer-plugin-api"
}
