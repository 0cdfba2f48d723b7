//! Phonetic key encoding used for fuzzy response lookups.
//!
//! # Design
//! The extractor only needs "do these two names sound alike", so encoding
//! sits behind `PhoneticEncoder`. `Metaphone` is the default: an English
//! consonant-approximation code that maps `lat` to `LT` and `lng` to `LNK`,
//! keeping short Google field names apart while tolerating spelling drift.

/// Turns a word into a comparable phonetic code.
pub trait PhoneticEncoder {
    /// Encode `word`, stopping once `max_len` code characters have been
    /// produced. A `max_len` of zero means unbounded.
    fn encode(&self, word: &str, max_len: usize) -> String;
}

impl<F> PhoneticEncoder for F
where
    F: Fn(&str, usize) -> String,
{
    fn encode(&self, word: &str, max_len: usize) -> String {
        self(word, max_len)
    }
}

/// Classic Metaphone over ASCII letters. Anything else is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metaphone;

impl PhoneticEncoder for Metaphone {
    fn encode(&self, word: &str, max_len: usize) -> String {
        let mut code = Code::new(max_len);
        let letters: Vec<u8> = word.bytes().map(|b| b.to_ascii_uppercase()).collect();
        let at = |i: usize| letters.get(i).copied().unwrap_or(0);

        let Some(mut i) = letters.iter().position(|b| b.is_ascii_alphabetic()) else {
            return code.finish();
        };

        // Leading-letter exceptions.
        let next = at(i + 1);
        match letters[i] {
            b'A' if next == b'E' => {
                code.push(b'E');
                i += 2;
            }
            b'A' => {
                code.push(b'A');
                i += 1;
            }
            b'G' | b'K' | b'P' if next == b'N' => {
                code.push(b'N');
                i += 2;
            }
            b'W' if next == b'R' => {
                code.push(b'R');
                i += 2;
            }
            b'W' if next == b'H' || is_vowel(next) => {
                code.push(b'W');
                i += 2;
            }
            b'X' => {
                code.push(b'S');
                i += 1;
            }
            c @ (b'E' | b'I' | b'O' | b'U') => {
                code.push(c);
                i += 1;
            }
            _ => {}
        }

        while i < letters.len() && !code.is_full() {
            let current = letters[i];
            let prev = if i == 0 { 0 } else { letters[i - 1] };
            let next = at(i + 1);
            let after = if next == 0 { 0 } else { at(i + 2) };
            let back = |n: usize| if i >= n { letters[i - n] } else { 0 };
            let mut skip = 0;

            if !current.is_ascii_alphabetic() || (current == prev && current != b'C') {
                i += 1;
                continue;
            }

            match current {
                b'B' => {
                    if !(prev == b'M' && next == 0) {
                        code.push(b'B');
                    }
                }
                b'C' => {
                    if is_soft(next) {
                        if next == b'I' && after == b'A' {
                            code.push(b'X');
                        } else if prev != b'S' {
                            code.push(b'S');
                        }
                    } else if next == b'H' {
                        // SCHOOL, CHRIST
                        code.push(if after == b'R' || prev == b'S' { b'K' } else { b'X' });
                        skip = 1;
                    } else {
                        code.push(b'K');
                    }
                }
                b'D' => {
                    if next == b'G' && is_soft(after) {
                        code.push(b'J');
                        skip = 1;
                    } else {
                        code.push(b'T');
                    }
                }
                b'G' => {
                    if next == b'H' {
                        if !(matches!(back(3), b'B' | b'D' | b'H') || back(4) == b'H') {
                            code.push(b'F');
                            skip = 1;
                        }
                    } else if next == b'N' {
                        let silent = !after.is_ascii_alphabetic() || (after == b'E' && at(i + 3) == b'D');
                        if !silent {
                            code.push(b'K');
                        }
                    } else if is_soft(next) && prev != b'G' {
                        code.push(b'J');
                    } else {
                        code.push(b'K');
                    }
                }
                b'H' => {
                    if is_vowel(next) && !matches!(prev, b'C' | b'G' | b'P' | b'S' | b'T') {
                        code.push(b'H');
                    }
                }
                b'K' => {
                    if prev != b'C' {
                        code.push(b'K');
                    }
                }
                b'P' => code.push(if next == b'H' { b'F' } else { b'P' }),
                b'Q' => code.push(b'K'),
                b'S' => {
                    if next == b'I' && (after == b'O' || after == b'A') {
                        code.push(b'X');
                    } else if next == b'H' {
                        code.push(b'X');
                        skip = 1;
                    } else if next == b'C' && after == b'H' && at(i + 3) == b'W' {
                        code.push(b'X');
                        skip = 2;
                    } else {
                        code.push(b'S');
                    }
                }
                b'T' => {
                    if next == b'I' && (after == b'O' || after == b'A') {
                        code.push(b'X');
                    } else if next == b'H' {
                        code.push(b'0');
                        skip = 1;
                    } else if !(next == b'C' && after == b'H') {
                        code.push(b'T');
                    }
                }
                b'V' => code.push(b'F'),
                b'W' | b'Y' => {
                    if is_vowel(next) {
                        code.push(current);
                    }
                }
                b'X' => {
                    code.push(b'K');
                    code.push(b'S');
                }
                b'Z' => code.push(b'S'),
                b'F' | b'J' | b'L' | b'M' | b'N' | b'R' => code.push(current),
                // Vowels past the first letter are dropped.
                _ => {}
            }

            i += 1 + skip;
        }

        code.finish()
    }
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'A' | b'E' | b'I' | b'O' | b'U')
}

/// Letters that soften a preceding C or G.
fn is_soft(c: u8) -> bool {
    matches!(c, b'E' | b'I' | b'Y')
}

struct Code {
    out: String,
    max_len: usize,
}

impl Code {
    fn new(max_len: usize) -> Self {
        Self {
            out: String::new(),
            max_len,
        }
    }

    fn push(&mut self, c: u8) {
        self.out.push(char::from(c));
    }

    fn is_full(&self) -> bool {
        self.max_len > 0 && self.out.len() >= self.max_len
    }

    /// `max_len` only stops the scan, so a trailing `KS` may overshoot it
    /// by one.
    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metaphone(word: &str) -> String {
        Metaphone.encode(word, 0)
    }

    #[test]
    fn google_coordinate_fields_differ() {
        assert_eq!(metaphone("lat"), "LT");
        assert_eq!(metaphone("lng"), "LNK");
        assert_ne!(metaphone("lat"), metaphone("lng"));
    }

    #[test]
    fn case_and_non_letters_are_ignored() {
        assert_eq!(metaphone("LAT"), metaphone("lat"));
        assert_eq!(metaphone("_lat"), "LT");
        assert_eq!(metaphone("0"), "");
        assert_eq!(metaphone(""), "");
    }

    #[test]
    fn vowels_survive_only_at_the_start() {
        assert_eq!(metaphone("address"), "ATRS");
        assert_eq!(metaphone("status"), "STTS");
        assert_eq!(metaphone("error"), "ERR");
    }

    #[test]
    fn leading_letter_rules() {
        assert_eq!(metaphone("knot"), "NT");
        assert_eq!(metaphone("aero"), "ER");
        assert_eq!(metaphone("write"), "RT");
        assert_eq!(metaphone("xenon"), "SNN");
    }

    #[test]
    fn digraphs() {
        assert_eq!(metaphone("location"), "LKXN");
        assert_eq!(metaphone("phone"), "FN");
        assert_eq!(metaphone("shape"), "XP");
        assert_eq!(metaphone("path"), "P0");
    }

    #[test]
    fn ch_is_hard_after_s_and_before_r() {
        assert_eq!(metaphone("school"), "SKL");
        assert_eq!(metaphone("christ"), "KRST");
        assert_eq!(metaphone("church"), "XRX");
        assert_eq!(metaphone("schwarz"), "XWRS");
    }

    #[test]
    fn max_len_bounds_the_code() {
        assert_eq!(Metaphone.encode("location", 2), "LK");
        assert_eq!(Metaphone.encode("box", 2), "BKS");
        assert_eq!(Metaphone.encode("lat", 10), "LT");
    }

    #[test]
    fn closures_are_encoders() {
        let upper = |word: &str, _max: usize| word.to_uppercase();
        assert_eq!(upper.encode("lat", 0), "LAT");
    }
}
