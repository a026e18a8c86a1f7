//! Dice roll expressions (`3D-3`, `2D`, `1D3+1`)
//!
//! Traveller damage and similar attributes are dice expressions rather than
//! plain numbers. A roll is a count of dice with a number of sides (D6 unless
//! stated) plus a constant.

use nom::branch::alt;
use nom::character::complete::{digit1, one_of};
use nom::combinator::{all_consuming, opt};
use nom::error::{Error, ErrorKind};
use nom::{IResult, Parser};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ForgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    count: i32,
    sides: u32,
    constant: i32,
}

impl DiceRoll {
    /// `count`D6 + `constant`
    pub const fn new(count: i32, constant: i32) -> Self {
        Self {
            count,
            sides: 6,
            constant,
        }
    }

    pub const fn with_sides(count: i32, sides: u32, constant: i32) -> Self {
        Self {
            count,
            sides,
            constant,
        }
    }

    /// A roll with no dice, just a constant
    pub const fn flat(constant: i32) -> Self {
        Self::new(0, constant)
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn constant(&self) -> i32 {
        self.constant
    }

    /// Add a constant to the roll
    pub fn add_constant(&self, value: i32) -> Self {
        Self {
            constant: self.constant + value,
            ..*self
        }
    }

    /// Add another roll's dice and constant. Dice count never drops below zero.
    pub fn add_roll(&self, other: &DiceRoll) -> Self {
        debug_assert!(
            other.count == 0 || other.sides == self.sides,
            "adding dice with a different number of sides"
        );
        Self {
            count: (self.count + other.count).max(0),
            sides: self.sides,
            constant: self.constant + other.constant,
        }
    }

    /// Mean result of the roll
    pub fn average(&self) -> f64 {
        self.count as f64 * (self.sides as f64 + 1.0) / 2.0 + self.constant as f64
    }

    /// Roll the dice. Results never drop below zero.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        let dice: i32 = (0..self.count.max(0))
            .map(|_| rng.gen_range(1..=self.sides.max(1) as i32))
            .sum();
        (dice + self.constant).max(0)
    }

    /// Text used when the roll is shown as a modifier (`+1D`, `-2`)
    pub fn signed_string(&self) -> String {
        let text = self.to_string();
        if text.starts_with('-') {
            text
        } else {
            format!("+{}", text)
        }
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.constant);
        }
        write!(f, "{}D", self.count)?;
        if self.sides != 6 {
            write!(f, "{}", self.sides)?;
        }
        match self.constant {
            0 => Ok(()),
            c if c > 0 => write!(f, "+{}", c),
            c => write!(f, "{}", c),
        }
    }
}

fn number(input: &str) -> IResult<&str, i32> {
    let (rest, digits) = digit1(input)?;
    let value = digits
        .parse::<i32>()
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Digit)))?;
    Ok((rest, value))
}

fn signed_constant(input: &str) -> IResult<&str, i32> {
    let (input, sign) = one_of("+-").parse(input)?;
    let (input, value) = number(input)?;
    Ok((input, if sign == '-' { -value } else { value }))
}

fn dice_roll(input: &str) -> IResult<&str, DiceRoll> {
    let (input, count) = opt(number).parse(input)?;
    let (input, _) = one_of("Dd").parse(input)?;
    let (input, sides) = opt(number).parse(input)?;
    let (input, constant) = opt(signed_constant).parse(input)?;
    let roll = DiceRoll::with_sides(
        count.unwrap_or(1),
        sides.unwrap_or(6) as u32,
        constant.unwrap_or(0),
    );
    Ok((input, roll))
}

fn flat_roll(input: &str) -> IResult<&str, DiceRoll> {
    let (input, sign) = opt(one_of("+-")).parse(input)?;
    let (input, value) = number(input)?;
    let value = if sign == Some('-') { -value } else { value };
    Ok((input, DiceRoll::flat(value)))
}

impl FromStr for DiceRoll {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        // Bound first so the parser borrow of `compact` ends before it drops
        let result = all_consuming(alt((dice_roll, flat_roll)))
            .parse(compact.as_str())
            .map(|(_, roll)| roll)
            .map_err(|_| ForgeError::DiceParse(s.to_string()));
        result
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = ForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> Self {
        roll.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(3, -3).to_string(), "3D-3");
        assert_eq!(DiceRoll::new(2, 0).to_string(), "2D");
        assert_eq!(DiceRoll::with_sides(1, 3, 1).to_string(), "1D3+1");
        assert_eq!(DiceRoll::flat(-2).to_string(), "-2");
    }

    #[test]
    fn test_parse_full_expression() {
        let roll: DiceRoll = "3D-3".parse().unwrap();
        assert_eq!(roll, DiceRoll::new(3, -3));
    }

    #[test]
    fn test_parse_implicit_count_and_sides() {
        let roll: DiceRoll = "d3".parse().unwrap();
        assert_eq!(roll, DiceRoll::with_sides(1, 3, 0));
    }

    #[test]
    fn test_parse_with_whitespace() {
        let roll: DiceRoll = " 4D + 2 ".parse().unwrap();
        assert_eq!(roll, DiceRoll::new(4, 2));
    }

    #[test]
    fn test_parse_flat() {
        assert_eq!("-1".parse::<DiceRoll>().unwrap(), DiceRoll::flat(-1));
        assert_eq!("5".parse::<DiceRoll>().unwrap(), DiceRoll::flat(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "3X+1".parse::<DiceRoll>(),
            Err(ForgeError::DiceParse(_))
        ));
        assert!("3D+".parse::<DiceRoll>().is_err());
        assert!("".parse::<DiceRoll>().is_err());
    }

    #[test]
    fn test_add_roll() {
        let damage = DiceRoll::new(3, -3);
        assert_eq!(damage.add_roll(&DiceRoll::new(1, 0)), DiceRoll::new(4, -3));
        assert_eq!(damage.add_constant(2), DiceRoll::new(3, -1));
        assert_eq!(
            DiceRoll::new(1, 0).add_roll(&DiceRoll::new(-3, 0)),
            DiceRoll::new(0, 0)
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(DiceRoll::new(2, 0).average(), 7.0);
        assert_eq!(DiceRoll::new(3, -3).average(), 7.5);
    }

    #[test]
    fn test_roll_within_bounds() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let damage = DiceRoll::new(3, -3);
        for _ in 0..200 {
            let result = damage.roll(&mut rng);
            assert!((0..=15).contains(&result));
        }
        assert_eq!(DiceRoll::flat(-2).roll(&mut rng), 0);
    }

    #[test]
    fn test_signed_string() {
        assert_eq!(DiceRoll::new(1, 0).signed_string(), "+1D");
        assert_eq!(DiceRoll::flat(-2).signed_string(), "-2");
    }

    #[test]
    fn test_serde_as_text() {
        let json = serde_json::to_string(&DiceRoll::new(3, -3)).unwrap();
        assert_eq!(json, "\"3D-3\"");
        let back: DiceRoll = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DiceRoll::new(3, -3));
    }
}
