//! Sibling labels for the four numbering styles.
//!
//! Top-level items get a bare label (`1`, `a`, `i`); anything nested is
//! wrapped in parentheses (`(1)`, `(a)`, `(i)`).

use rulebook_core::requirement::NumberingStyle;

/// Label for the item at zero-based `index` among its numbered siblings,
/// `depth` levels down (roots are depth 1).
pub fn label(style: NumberingStyle, index: usize, depth: usize) -> String {
  let bare = match style {
    NumberingStyle::Numeric => (index + 1).to_string(),
    NumberingStyle::Alphabetic => alphabetic(index),
    NumberingStyle::Roman => roman(index + 1),
    NumberingStyle::None => return String::new(),
  };
  if depth <= 1 { bare } else { format!("({bare})") }
}

/// `a` … `z`, then `aa`, `ab`, … (bijective base 26).
fn alphabetic(mut index: usize) -> String {
  let mut out = Vec::new();
  loop {
    out.push(b'a' + (index % 26) as u8);
    if index < 26 {
      break;
    }
    index = index / 26 - 1;
  }
  out.reverse();
  String::from_utf8(out).unwrap_or_default()
}

/// Lower-case roman numeral for `n >= 1`.
fn roman(mut n: usize) -> String {
  const TABLE: [(usize, &str); 13] = [
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
  ];
  let mut out = String::new();
  for (value, digits) in TABLE {
    while n >= value {
      out.push_str(digits);
      n -= value;
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn top_level_labels_are_bare() {
    assert_eq!(label(NumberingStyle::Numeric, 0, 1), "1");
    assert_eq!(label(NumberingStyle::Alphabetic, 2, 1), "c");
    assert_eq!(label(NumberingStyle::Roman, 3, 1), "iv");
    assert_eq!(label(NumberingStyle::None, 3, 1), "");
  }

  #[test]
  fn nested_labels_are_parenthesised() {
    assert_eq!(label(NumberingStyle::Numeric, 9, 2), "(10)");
    assert_eq!(label(NumberingStyle::Alphabetic, 0, 3), "(a)");
    assert_eq!(label(NumberingStyle::Roman, 8, 2), "(ix)");
    assert_eq!(label(NumberingStyle::None, 0, 2), "");
  }

  #[test]
  fn alphabetic_continues_past_z() {
    assert_eq!(alphabetic(25), "z");
    assert_eq!(alphabetic(26), "aa");
    assert_eq!(alphabetic(27), "ab");
    assert_eq!(alphabetic(701), "zz");
    assert_eq!(alphabetic(702), "aaa");
  }

  #[test]
  fn roman_beyond_ten() {
    assert_eq!(roman(11), "xi");
    assert_eq!(roman(14), "xiv");
    assert_eq!(roman(49), "xlix");
    assert_eq!(roman(1994), "mcmxciv");
  }
}
