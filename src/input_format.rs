use crate::error::ConstructionError;
use crate::formatter::{DEFAULT_DELIMITER, DEFAULT_INPUT_SKELETON};

/// Which text field a typed date came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputIdentifier {
    #[default]
    Single,
    Start,
    End,
}

/// A numeric input pattern such as `dd/MM/yyyy`, split into the part the
/// user types and the delimiters shown around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateInputFormat {
    pattern_with_delimiters: String,
    delimiter: char,
    without_delimiters: String,
    first_delimiter_index: usize,
    last_delimiter_index: usize,
}

impl DateInputFormat {
    /// The delimiter must appear exactly twice with a non-empty field on
    /// either side of each occurrence.
    pub fn new(pattern_with_delimiters: &str, delimiter: char) -> Result<Self, ConstructionError> {
        let chars: Vec<char> = pattern_with_delimiters.chars().collect();
        let positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == delimiter)
            .map(|(i, _)| i)
            .collect();
        let &[first, last] = positions.as_slice() else {
            return Err(ConstructionError::DelimiterCount {
                pattern: pattern_with_delimiters.to_string(),
                delimiter,
                found: positions.len(),
            });
        };
        if first == 0 || last == first + 1 || last + 1 == chars.len() {
            return Err(ConstructionError::EmptyInputField {
                pattern: pattern_with_delimiters.to_string(),
            });
        }

        Ok(DateInputFormat {
            pattern_with_delimiters: pattern_with_delimiters.to_string(),
            delimiter,
            without_delimiters: chars.iter().filter(|c| **c != delimiter).collect(),
            first_delimiter_index: first,
            last_delimiter_index: last,
        })
    }

    pub fn pattern_with_delimiters(&self) -> &str {
        &self.pattern_with_delimiters
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn without_delimiters(&self) -> &str {
        &self.without_delimiters
    }

    /// Number of characters the user types.
    pub fn input_length(&self) -> usize {
        self.without_delimiters.chars().count()
    }

    pub fn first_delimiter_index(&self) -> usize {
        self.first_delimiter_index
    }

    pub fn last_delimiter_index(&self) -> usize {
        self.last_delimiter_index
    }

    /// The pattern as shown to users in error messages, e.g. `DD/MM/YYYY`.
    pub fn upper_pattern(&self) -> String {
        self.pattern_with_delimiters.to_uppercase()
    }

    /// Inserts delimiters into typed text for display. Input beyond the
    /// pattern's length is cut off.
    pub fn transform(&self, raw: &str) -> TransformedText {
        let first = self.first_delimiter_index;
        let second = self.last_delimiter_index;
        let mut text = String::with_capacity(raw.len() + 2);
        for (index, ch) in raw.chars().take(self.input_length()).enumerate() {
            text.push(ch);
            if index + 1 == first || index + 2 == second {
                text.push(self.delimiter);
            }
        }
        TransformedText {
            text,
            first_delimiter_offset: first,
            second_delimiter_offset: second,
            input_length: self.input_length(),
        }
    }
}

impl Default for DateInputFormat {
    /// `yyyy/MM/dd`.
    fn default() -> Self {
        DateInputFormat {
            pattern_with_delimiters: DEFAULT_INPUT_SKELETON.to_string(),
            delimiter: DEFAULT_DELIMITER,
            without_delimiters: "yyyyMMdd".to_string(),
            first_delimiter_index: 4,
            last_delimiter_index: 7,
        }
    }
}

/// Display text with delimiters, and the cursor mapping between it and the
/// raw typed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformedText {
    text: String,
    first_delimiter_offset: usize,
    second_delimiter_offset: usize,
    input_length: usize,
}

impl TransformedText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original_to_transformed(&self, offset: usize) -> usize {
        if offset < self.first_delimiter_offset {
            offset
        } else if offset < self.second_delimiter_offset {
            offset + 1
        } else if offset <= self.input_length {
            offset + 2
        } else {
            self.input_length + 2
        }
    }

    pub fn transformed_to_original(&self, offset: usize) -> usize {
        if offset < self.first_delimiter_offset {
            offset
        } else if offset < self.second_delimiter_offset {
            offset - 1
        } else if offset <= self.input_length + 1 {
            offset - 2
        } else {
            self.input_length
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_delimiters_and_records_positions() {
        let f = DateInputFormat::new("dd/MM/yyyy", '/').unwrap();
        assert_eq!(f.without_delimiters(), "ddMMyyyy");
        assert_eq!(f.first_delimiter_index(), 2);
        assert_eq!(f.last_delimiter_index(), 5);
        assert_eq!(f.input_length(), 8);
        assert_eq!(f.upper_pattern(), "DD/MM/YYYY");
    }

    #[test]
    fn default_matches_constructed_format() {
        assert_eq!(
            Ok(DateInputFormat::default()),
            DateInputFormat::new(DEFAULT_INPUT_SKELETON, DEFAULT_DELIMITER)
        );
    }

    #[test]
    fn rejects_wrong_delimiter_count() {
        assert_eq!(
            DateInputFormat::new("yyyyMMdd", '/'),
            Err(ConstructionError::DelimiterCount {
                pattern: "yyyyMMdd".into(),
                delimiter: '/',
                found: 0,
            })
        );
        assert!(matches!(
            DateInputFormat::new("y/M/d/G", '/'),
            Err(ConstructionError::DelimiterCount { found: 3, .. })
        ));
        assert!(matches!(
            DateInputFormat::new("dd//yyyy", '/'),
            Err(ConstructionError::EmptyInputField { .. })
        ));
        assert!(matches!(
            DateInputFormat::new("/MM/yyyy", '/'),
            Err(ConstructionError::EmptyInputField { .. })
        ));
        assert!(matches!(
            DateInputFormat::new("dd/MM/", '/'),
            Err(ConstructionError::EmptyInputField { .. })
        ));
    }

    #[test]
    fn transform_inserts_delimiters_while_typing() {
        let f = DateInputFormat::new("yyyy/MM/dd", '/').unwrap();
        assert_eq!(f.transform("").text(), "");
        assert_eq!(f.transform("144").text(), "144");
        assert_eq!(f.transform("1446").text(), "1446/");
        assert_eq!(f.transform("14460").text(), "1446/0");
        assert_eq!(f.transform("144609").text(), "1446/09/");
        assert_eq!(f.transform("14460901").text(), "1446/09/01");
        assert_eq!(f.transform("1446090123").text(), "1446/09/01");
    }

    #[test]
    fn cursor_offsets_map_both_ways() {
        let f = DateInputFormat::new("dd/MM/yyyy", '/').unwrap();
        let t = f.transform("01091446");
        assert_eq!(t.text(), "01/09/1446");
        for (original, transformed) in [(0, 0), (1, 1), (2, 3), (4, 5), (5, 7), (8, 10), (9, 10)] {
            assert_eq!(t.original_to_transformed(original), transformed, "original {original}");
        }
        for (transformed, original) in [(0, 0), (1, 1), (3, 2), (4, 3), (6, 4), (10, 8), (11, 8)] {
            assert_eq!(t.transformed_to_original(transformed), original, "transformed {transformed}");
        }
        // Lossy right before a delimiter.
        assert_eq!(t.transformed_to_original(2), 1);
    }
}
