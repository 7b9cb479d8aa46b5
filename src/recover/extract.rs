//! Type Extractor - pull the erased type out of a symbol name
//!
//! The erasing function is instantiated once per erased type, so its
//! demangled symbol carries that type as the template argument:
//!
//!   dixelu::details::mfunc<T>(void*, void*, dixelu::details::adj_mf_ops)
//!
//! The pattern is anchored on the function's qualified name and on the
//! erasure-tag type in the last parameter position, so an unrelated symbol
//! that happens to live at the queried address is rejected rather than
//! mis-parsed. The capture is greedy, which keeps nested template arguments
//! (e.g. `std::vector<std::pair<int, int>>`) whole.

use regex::Regex;
use std::sync::OnceLock;

/// Qualified name of the erasing function template in the inspected program
pub const ERASING_FUNCTION: &str = "dixelu::details::mfunc";
/// Tag type that disambiguates the erasing function's signature
pub const ERASURE_TAG: &str = "dixelu::details::adj_mf_ops";

/// Compiled matching rule for one erasure convention.
///
/// A value rather than a hard-coded regex so a different erasing function or
/// tag type can be swapped in without touching the renderer.
pub struct ErasurePattern {
    re: Regex,
}

impl ErasurePattern {
    /// Pattern for an erasing function `function<T>(void*, void*, .. tag)`.
    pub fn new(function: &str, tag: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!(
            r"{}<(.*)>\(\s*void\*\s*,\s*void\*\s*,.*{}\s*\)",
            regex::escape(function),
            regex::escape(tag),
        ))?;
        Ok(Self { re })
    }

    /// The built-in `mfunc` / `adj_mf_ops` convention.
    pub fn mfunc() -> &'static ErasurePattern {
        static PATTERN: OnceLock<ErasurePattern> = OnceLock::new();
        PATTERN.get_or_init(|| {
            ErasurePattern::new(ERASING_FUNCTION, ERASURE_TAG)
                .expect("built-in erasure pattern is a valid regex")
        })
    }

    /// Captured type argument of the first match in `symbol`, verbatim.
    ///
    /// The first match is authoritative; symbol text is expected to be
    /// unambiguous under this pattern. Returns the captured text even when
    /// it denotes the null erasure tag - that token is the renderer's to
    /// interpret.
    pub fn extract(&self, symbol: &str) -> Option<String> {
        self.re
            .captures(symbol)
            .map(|caps| caps[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_type() {
        let sym = "dixelu::details::mfunc<int>(void*, void*, dixelu::details::adj_mf_ops)";
        assert_eq!(
            ErasurePattern::mfunc().extract(sym),
            Some("int".to_string())
        );
    }

    #[test]
    fn keeps_nested_template_arguments_whole() {
        let sym = "dixelu::details::mfunc<std::vector<std::pair<int, int>, \
                   std::allocator<std::pair<int, int>>>>(void*, void*, \
                   dixelu::details::adj_mf_ops)";
        assert_eq!(
            ErasurePattern::mfunc().extract(sym),
            Some(
                "std::vector<std::pair<int, int>, std::allocator<std::pair<int, int>>>"
                    .to_string()
            )
        );
    }

    #[test]
    fn tolerates_whitespace_between_parameters() {
        let sym = "dixelu::details::mfunc<double>( void* , void* , dixelu::details::adj_mf_ops )";
        assert_eq!(
            ErasurePattern::mfunc().extract(sym),
            Some("double".to_string())
        );
    }

    #[test]
    fn null_erasure_tag_is_captured_verbatim() {
        let sym =
            "dixelu::details::mfunc<decltype(nullptr)>(void*, void*, dixelu::details::adj_mf_ops)";
        assert_eq!(
            ErasurePattern::mfunc().extract(sym),
            Some("decltype(nullptr)".to_string())
        );
    }

    #[test]
    fn unrelated_symbol_is_rejected() {
        assert_eq!(ErasurePattern::mfunc().extract("main"), None);
        assert_eq!(
            ErasurePattern::mfunc().extract("some::other::mfunc_like(void*, void*, int)"),
            None
        );
    }

    #[test]
    fn wrong_tag_type_is_rejected() {
        let sym = "dixelu::details::mfunc<int>(void*, void*, other::tag)";
        assert_eq!(ErasurePattern::mfunc().extract(sym), None);
    }

    #[test]
    fn first_match_is_authoritative() {
        // Symbol text with two candidate lines: the first one wins
        let sym = "dixelu::details::mfunc<int>(void*, void*, dixelu::details::adj_mf_ops)\n\
                   dixelu::details::mfunc<long>(void*, void*, dixelu::details::adj_mf_ops)";
        assert_eq!(
            ErasurePattern::mfunc().extract(sym),
            Some("int".to_string())
        );
    }

    #[test]
    fn custom_convention_can_be_swapped_in() {
        let pattern = ErasurePattern::new("acme::erase", "acme::tag").unwrap();
        let sym = "acme::erase<float>(void*, void*, acme::tag)";
        assert_eq!(pattern.extract(sym), Some("float".to_string()));
        assert_eq!(
            pattern.extract(
                "dixelu::details::mfunc<float>(void*, void*, dixelu::details::adj_mf_ops)"
            ),
            None
        );
    }
}
