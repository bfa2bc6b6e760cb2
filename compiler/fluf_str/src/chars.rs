//! Character class predicates.
//!
//! Byte predicates cover ASCII only. Identifier predicates take a decoded
//! `char` and fall back to the Unicode XID tables past ASCII.

use unicode_xid::UnicodeXID;

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
pub fn is_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Space, tab, newline, carriage return, vertical tab or form feed.
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Can `c` begin an identifier?
#[inline]
pub fn is_ident_start(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic() || c == '_'
    } else {
        UnicodeXID::is_xid_start(c)
    }
}

/// Can `c` continue an identifier?
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '_'
    } else {
        UnicodeXID::is_xid_continue(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_classes() {
        assert!(is_digit(b'7'));
        assert!(!is_digit(b'a'));
        assert!(is_hex(b'F'));
        assert!(is_hex(b'a'));
        assert!(!is_hex(b'g'));
        assert!(is_alpha(b'Z'));
        assert!(!is_alpha(b'_'));
        assert!(is_alnum(b'0'));
        assert!(!is_alnum(0xC3));
    }

    #[test]
    fn space_includes_vertical_tab_and_form_feed() {
        for b in [b' ', b'\t', b'\n', b'\r', 0x0B, 0x0C] {
            assert!(is_space(b), "{b:#04x}");
        }
        assert!(!is_space(b'x'));
        assert!(!is_space(0));
    }

    #[test]
    fn identifiers() {
        assert!(is_ident_start('_'));
        assert!(is_ident_start('a'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('1'));
        assert!(!is_ident_continue('-'));

        assert!(is_ident_start('é'));
        assert!(is_ident_start('λ'));
        assert!(is_ident_start('中'));
        assert!(!is_ident_start('€'));
        // Combining acute accent continues but cannot start.
        assert!(!is_ident_start('\u{0301}'));
        assert!(is_ident_continue('\u{0301}'));
    }
}
