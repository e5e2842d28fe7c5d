//! User-Agent string sent with every icon request.

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("icon-audit/{version} (icon-format-audit)")
}
