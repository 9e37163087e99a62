//! Process-wide string interner for ability names.
//!
//! Events are copied into every window they are attributed to, so names are
//! stored as a `Spur` key instead of an owned `String`.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

pub type IStr = Spur;

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

pub fn intern(s: &str) -> IStr {
    INTERNER.get_or_intern(s)
}

pub fn resolve(key: IStr) -> &'static str {
    // LazyLock keeps the rodeo alive for the whole process
    let rodeo: &'static ThreadedRodeo = &INTERNER;
    rodeo.resolve(&key)
}

pub fn empty_istr() -> IStr {
    INTERNER.get_or_intern_static("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let a = intern("Soul Harvest");
        let b = intern("Soul Harvest");
        assert_eq!(a, b);
        assert_eq!(resolve(a), "Soul Harvest");
        assert_eq!(resolve(empty_istr()), "");
    }
}
