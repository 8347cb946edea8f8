use serde::{Deserialize, Serialize};

const VERSION_PREFIX: &str = "001";
const RADIX: u32 = 32;
const RADIX_BITS: usize = 5;

/// Largest width or height a single base-32 digit can carry.
pub const MAX_LAYOUT_DIMENSION: usize = 31;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutCodeError {
    #[error("unsupported layout code version {0:?}")]
    UnsupportedVersion(String),
    #[error("layout code is missing its dimensions")]
    MissingDimensions,
    #[error("invalid base-32 digit {ch:?} at position {index}")]
    InvalidDigit { ch: char, index: usize },
    #[error("layout dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("layout code has {found} row digits, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("row {row} is missing its marker bit")]
    MissingMarker { row: usize },
    #[error("{width}x{height} does not fit in a layout code (max {max})", max = MAX_LAYOUT_DIMENSION)]
    TooLarge { width: usize, height: usize },
}

/// Mask of active cells for a playing area, row-major, without the border ring.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
    active: Vec<bool>,
}

impl Shape {
    pub fn rectangle(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            active: vec![true; width * height],
        }
    }

    pub fn from_mask(width: usize, height: usize, active: Vec<bool>) -> Option<Self> {
        if active.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            active,
        })
    }

    /// `row` and `col` are zero-based within the playing area.
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.active[row * self.width + col]
    }

    pub fn set_active(&mut self, row: usize, col: usize, active: bool) {
        if row < self.height && col < self.width {
            self.active[row * self.width + col] = active;
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// The active cell closest to the middle of the area, first in row-major order
    /// on ties. This is the centre itself whenever the centre exists and is active.
    pub fn active_cell_nearest_center(&self) -> Option<(usize, usize)> {
        // doubled coordinates keep the midpoint of an even dimension integral
        let (mid_row, mid_col) = (self.height.saturating_sub(1), self.width.saturating_sub(1));
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (row, col)))
            .filter(|&(row, col)| self.is_active(row, col))
            .min_by_key(|&(row, col)| (2 * row).abs_diff(mid_row) + (2 * col).abs_diff(mid_col))
    }

    pub fn is_rectangle(&self) -> bool {
        self.active.iter().all(|&a| a)
    }

    #[cfg(test)]
    /// `#` for an active cell, `.` for a blank one.
    pub fn parse(s: &str) -> Self {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let height = rows.len();
        let width = rows[0].len();
        let active = rows
            .iter()
            .flat_map(|row| row.chars().map(|ch| ch == '#'))
            .collect();
        Self::from_mask(width, height, active).unwrap()
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}x{}", self.width, self.height)?;
        for row in 0..self.height {
            let line: String = (0..self.width)
                .map(|col| if self.is_active(row, col) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Compact text form of a [`Shape`], suitable for a shareable link.
///
/// `"001"`, then one base-32 digit each for width and height, then one fixed-width
/// group of base-32 digits per row. Each group is the bit string `1` followed by one
/// bit per column, right-padded with zeros to a whole number of digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct LayoutCode(String);

fn digits_per_row(width: usize) -> usize {
    (width + 1).div_ceil(RADIX_BITS)
}

fn digit_value(ch: char, index: usize) -> Result<u64, LayoutCodeError> {
    ch.to_digit(RADIX)
        .map(u64::from)
        .ok_or(LayoutCodeError::InvalidDigit { ch, index })
}

impl LayoutCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encode(shape: &Shape) -> Result<LayoutCode, LayoutCodeError> {
        let (width, height) = (shape.width, shape.height);
        if width == 0 || height == 0 {
            return Err(LayoutCodeError::ZeroDimension { width, height });
        }
        if width > MAX_LAYOUT_DIMENSION || height > MAX_LAYOUT_DIMENSION {
            return Err(LayoutCodeError::TooLarge { width, height });
        }

        let digits = digits_per_row(width);
        let total_bits = digits * RADIX_BITS;
        let mut code = String::from(VERSION_PREFIX);
        code.push(to_digit(width as u64));
        code.push(to_digit(height as u64));

        for row in 0..height {
            let mut value: u64 = 1 << (total_bits - 1);
            for col in 0..width {
                if shape.is_active(row, col) {
                    value |= 1 << (total_bits - 2 - col);
                }
            }
            for i in (0..digits).rev() {
                code.push(to_digit((value >> (i * RADIX_BITS)) & 0x1f));
            }
        }

        Ok(LayoutCode(code))
    }

    pub fn decode(code: &str) -> Result<Shape, LayoutCodeError> {
        let chars: Vec<char> = code.trim().chars().collect();
        if chars.len() < VERSION_PREFIX.len() {
            return Err(LayoutCodeError::UnsupportedVersion(code.to_string()));
        }
        let prefix: String = chars[..VERSION_PREFIX.len()].iter().collect();
        if prefix != VERSION_PREFIX {
            return Err(LayoutCodeError::UnsupportedVersion(prefix));
        }
        if chars.len() < VERSION_PREFIX.len() + 2 {
            return Err(LayoutCodeError::MissingDimensions);
        }

        let width = digit_value(chars[3], 3)? as usize;
        let height = digit_value(chars[4], 4)? as usize;
        if width == 0 || height == 0 {
            return Err(LayoutCodeError::ZeroDimension { width, height });
        }

        let digits = digits_per_row(width);
        let total_bits = digits * RADIX_BITS;
        let body = &chars[5..];
        if body.len() != digits * height {
            return Err(LayoutCodeError::WrongLength {
                expected: digits * height,
                found: body.len(),
            });
        }

        let mut shape = Shape::from_mask(width, height, vec![false; width * height])
            .ok_or(LayoutCodeError::MissingDimensions)?;
        for (row, group) in body.chunks(digits).enumerate() {
            let mut value: u64 = 0;
            for (offset, &ch) in group.iter().enumerate() {
                value = (value << RADIX_BITS) | digit_value(ch, 5 + row * digits + offset)?;
            }
            if value & (1 << (total_bits - 1)) == 0 {
                return Err(LayoutCodeError::MissingMarker { row });
            }
            for col in 0..width {
                shape.set_active(row, col, value & (1 << (total_bits - 2 - col)) != 0);
            }
        }

        Ok(shape)
    }
}

fn to_digit(value: u64) -> char {
    std::char::from_digit(value as u32, RADIX).unwrap_or('0')
}

impl std::fmt::Display for LayoutCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for LayoutCode {
    type Err = LayoutCodeError;

    /// Accepts only codes that decode to a shape.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LayoutCode::decode(value)?;
        Ok(LayoutCode(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_cell_nearest_center() {
        assert_eq!(Shape::rectangle(5, 3).active_cell_nearest_center(), Some((1, 2)));

        let ring = Shape::parse(
            "
            ###
            #.#
            ###
            ",
        );
        assert_eq!(ring.active_cell_nearest_center(), Some((0, 1)));

        let ragged = Shape::parse(
            "
            ###.
            ##..
            ",
        );
        assert_eq!(ragged.active_cell_nearest_center(), Some((0, 1)));

        let blank = Shape::from_mask(2, 2, vec![false; 4]).unwrap();
        assert_eq!(blank.active_cell_nearest_center(), None);
    }

    #[test]
    fn test_encode_small_rectangle() {
        // width 2 -> one digit per row; "111" padded to "11100" = 28 = 's'
        let code = LayoutCode::encode(&Shape::rectangle(2, 3)).unwrap();
        assert_eq!(code.as_str(), "00123sss");
    }

    #[test]
    fn test_encode_partial_row() {
        let shape = Shape::parse(
            "
            #.#.
            .##.
            ",
        );
        // "11010" = 26 = 'q', "10110" = 22 = 'm'
        let code = LayoutCode::encode(&shape).unwrap();
        assert_eq!(code.as_str(), "00142qm");
        assert_eq!(LayoutCode::decode(code.as_str()).unwrap(), shape);
    }

    #[test]
    fn test_multi_digit_rows() {
        let shape = Shape::rectangle(17, 8);
        let code = LayoutCode::encode(&shape).unwrap();
        // 18 bits -> 4 digits per row
        assert_eq!(code.as_str().len(), 5 + 4 * 8);
        assert!(code.as_str().starts_with("001h8"));
        let decoded = LayoutCode::decode(code.as_str()).unwrap();
        assert!(decoded.is_rectangle());
        assert_eq!(decoded.active_count(), 136);
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        let shape = LayoutCode::decode("00123SSS").unwrap();
        assert_eq!(shape.active_count(), 6);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            LayoutCode::decode("002"),
            Err(LayoutCodeError::UnsupportedVersion(_))
        ));
        assert_eq!(
            LayoutCode::decode("001"),
            Err(LayoutCodeError::MissingDimensions)
        );
        assert_eq!(
            LayoutCode::decode("00103"),
            Err(LayoutCodeError::ZeroDimension {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            LayoutCode::decode("00123ss"),
            Err(LayoutCodeError::WrongLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            LayoutCode::decode("00123s!s"),
            Err(LayoutCodeError::InvalidDigit { ch: '!', index: 6 })
        );
        // "01100" = 12 = 'c' lacks the marker bit
        assert_eq!(
            LayoutCode::decode("00121c"),
            Err(LayoutCodeError::MissingMarker { row: 0 })
        );
    }

    #[test]
    fn test_encode_too_large() {
        assert_eq!(
            LayoutCode::encode(&Shape::rectangle(32, 4)),
            Err(LayoutCodeError::TooLarge {
                width: 32,
                height: 4
            })
        );
    }

    #[test]
    fn test_from_str_validates() {
        assert!("00123sss".parse::<LayoutCode>().is_ok());
        assert!("garbage".parse::<LayoutCode>().is_err());
    }
}
