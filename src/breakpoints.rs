//! Breakpoint selection.

/// Resolve the effective breakpoints for a capture mode.
///
/// A defined, non-empty mode list wins verbatim; otherwise the global list
/// applies. An empty result means "capture at the default viewport".
pub fn select_breakpoints(global: Option<&[u32]>, mode: Option<&[u32]>) -> Vec<u32> {
    match mode {
        Some(mode) if !mode.is_empty() => mode.to_vec(),
        _ => global.map(<[u32]>::to_vec).unwrap_or_default(),
    }
}
