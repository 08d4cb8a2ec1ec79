use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConsistencyError;

/// Enum representing the kind of play called.
///
/// The declaration order is the enumeration order used everywhere a play type
/// acts as an index: per-type count tables, bit sets and rendered leaf lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlayType {
    RunLeft = 0,
    RunMiddle = 1,
    RunRight = 2,
    PassShortRight = 3,
    PassShortMiddle = 4,
    PassShortLeft = 5,
    PassDeepRight = 6,
    PassDeepMiddle = 7,
    PassDeepLeft = 8,
    FieldGoal = 9,
    Punt = 10,
}

impl PlayType {
    /// Number of play types (11).
    pub const LEN: usize = 11;

    pub const ALL: [Self; Self::LEN] = [
        Self::RunLeft,
        Self::RunMiddle,
        Self::RunRight,
        Self::PassShortRight,
        Self::PassShortMiddle,
        Self::PassShortLeft,
        Self::PassDeepRight,
        Self::PassDeepMiddle,
        Self::PassDeepLeft,
        Self::FieldGoal,
        Self::Punt,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the human-readable label of this play type.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::PlayType;
    ///
    /// assert_eq!(PlayType::RunMiddle.as_str(), "Run Up Middle");
    /// assert_eq!(PlayType::FieldGoal.as_str(), "Field Goal Attempt");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunLeft => "Run Left",
            Self::RunMiddle => "Run Up Middle",
            Self::RunRight => "Run Right",
            Self::PassShortRight => "Short Pass Right",
            Self::PassShortMiddle => "Short Pass Middle",
            Self::PassShortLeft => "Short Pass Left",
            Self::PassDeepRight => "Deep Pass Right",
            Self::PassDeepMiddle => "Deep Pass Middle",
            Self::PassDeepLeft => "Deep Pass Left",
            Self::FieldGoal => "Field Goal Attempt",
            Self::Punt => "Punt",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Situational attribute a decision node can split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Attribute {
    DownNumber = 0,
    DistanceNeeded = 1,
    FieldLocation = 2,
    TimeRemaining = 3,
    ScoreDifferential = 4,
}

impl Attribute {
    /// Number of attributes (5).
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::DownNumber,
        Self::DistanceNeeded,
        Self::FieldLocation,
        Self::TimeRemaining,
        Self::ScoreDifferential,
    ];

    /// Largest category count over all attributes.
    pub const MAX_CATEGORIES: usize = ScoreDifferential::LEN;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the number of categories of this attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::Attribute;
    ///
    /// assert_eq!(Attribute::DownNumber.category_count(), 5);
    /// assert_eq!(Attribute::TimeRemaining.category_count(), 2);
    /// ```
    #[must_use]
    pub const fn category_count(self) -> usize {
        match self {
            Self::DownNumber => Down::LEN,
            Self::DistanceNeeded => DistanceNeeded::LEN,
            Self::FieldLocation => FieldLocation::LEN,
            Self::TimeRemaining => TimeRemaining::LEN,
            Self::ScoreDifferential => ScoreDifferential::LEN,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DownNumber => "down_number",
            Self::DistanceNeeded => "distance_needed",
            Self::FieldLocation => "field_location",
            Self::TimeRemaining => "time_remaining",
            Self::ScoreDifferential => "score_differential",
        }
    }

    /// Returns the human-readable label of `category` for this attribute.
    ///
    /// Down values render as their number. Out of range categories yield `None`.
    #[must_use]
    pub fn category_label(self, category: usize) -> Option<String> {
        let label = match self {
            Self::DownNumber => return Down::from_index(category).map(|d| d.to_string()),
            Self::DistanceNeeded => DistanceNeeded::ALL.get(category)?.as_str(),
            Self::FieldLocation => FieldLocation::ALL.get(category)?.as_str(),
            Self::TimeRemaining => TimeRemaining::ALL.get(category)?.as_str(),
            Self::ScoreDifferential => ScoreDifferential::ALL.get(category)?.as_str(),
        };
        Some(label.to_owned())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Down number of a play, `0..=4`.
///
/// Down 0 is kept as its own category for plays the source data leaves without
/// a regular down (conversions and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Down(u8);

impl Down {
    /// Number of down categories (5).
    pub const LEN: usize = 5;

    /// Returns the down for `raw`, or `None` if it lies outside `0..=4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::Down;
    ///
    /// assert_eq!(Down::new(3).map(Down::number), Some(3));
    /// assert_eq!(Down::new(5), None);
    /// assert_eq!(Down::new(-1), None);
    /// ```
    #[must_use]
    pub fn new(raw: i32) -> Option<Self> {
        u8::try_from(raw)
            .ok()
            .filter(|&d| usize::from(d) < Self::LEN)
            .map(Self)
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        i32::try_from(index).ok().and_then(Self::new)
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Down {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DistanceNeeded {
    OverTwenty = 0,
    TenToTwenty = 1,
    FourToTen = 2,
    OneToFour = 3,
    OneOrLess = 4,
}

impl DistanceNeeded {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::OverTwenty,
        Self::TenToTwenty,
        Self::FourToTen,
        Self::OneToFour,
        Self::OneOrLess,
    ];

    /// Categorizes the yards needed for a first down.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::DistanceNeeded;
    ///
    /// assert_eq!(DistanceNeeded::from_yards(1), DistanceNeeded::OneOrLess);
    /// assert_eq!(DistanceNeeded::from_yards(10), DistanceNeeded::FourToTen);
    /// assert_eq!(DistanceNeeded::from_yards(20), DistanceNeeded::OverTwenty);
    /// ```
    #[must_use]
    pub const fn from_yards(yards: i32) -> Self {
        if yards <= 1 {
            Self::OneOrLess
        } else if yards <= 4 {
            Self::OneToFour
        } else if yards <= 10 {
            Self::FourToTen
        } else if yards < 20 {
            Self::TenToTwenty
        } else {
            Self::OverTwenty
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OverTwenty => "over twenty yards",
            Self::TenToTwenty => "ten to twenty yards",
            Self::FourToTen => "four to ten yards",
            Self::OneToFour => "one to four yards",
            Self::OneOrLess => "less than one yard",
        }
    }
}

impl fmt::Display for DistanceNeeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FieldLocation {
    OwnRedZone = 0,
    Middle = 1,
    OpponentRedZone = 2,
}

impl FieldLocation {
    pub const LEN: usize = 3;

    pub const ALL: [Self; Self::LEN] = [Self::OwnRedZone, Self::Middle, Self::OpponentRedZone];

    /// Categorizes the yards remaining to the opponent's goal line.
    #[must_use]
    pub const fn from_yard_line(yards_to_goal: i32) -> Self {
        if yards_to_goal >= 90 {
            Self::OwnRedZone
        } else if yards_to_goal > 10 {
            Self::Middle
        } else {
            Self::OpponentRedZone
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OwnRedZone => "backed up, own red zone",
            Self::Middle => "between red zones",
            Self::OpponentRedZone => "scoring range, opponent red zone",
        }
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TimeRemaining {
    OutsideTwoMinutes = 0,
    InsideTwoMinutes = 1,
}

impl TimeRemaining {
    pub const LEN: usize = 2;

    pub const ALL: [Self; Self::LEN] = [Self::OutsideTwoMinutes, Self::InsideTwoMinutes];

    /// Categorizes the minutes left in the game.
    ///
    /// Both the end of the game and the end of the first half count as inside
    /// the two minute warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::TimeRemaining;
    ///
    /// assert_eq!(TimeRemaining::from_minutes(1), TimeRemaining::InsideTwoMinutes);
    /// assert_eq!(TimeRemaining::from_minutes(31), TimeRemaining::InsideTwoMinutes);
    /// assert_eq!(TimeRemaining::from_minutes(32), TimeRemaining::OutsideTwoMinutes);
    /// ```
    #[must_use]
    pub const fn from_minutes(minutes: i32) -> Self {
        if minutes < 2 || (minutes >= 30 && minutes < 32) {
            Self::InsideTwoMinutes
        } else {
            Self::OutsideTwoMinutes
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutsideTwoMinutes => "Outside two minute warning",
            Self::InsideTwoMinutes => "Inside two minute warning",
        }
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ScoreDifferential {
    DownOverFourteen = 0,
    DownSevenToFourteen = 1,
    DownUpToSeven = 2,
    Tied = 3,
    UpUpToSeven = 4,
    UpSevenToFourteen = 5,
    UpOverFourteen = 6,
}

impl ScoreDifferential {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::DownOverFourteen,
        Self::DownSevenToFourteen,
        Self::DownUpToSeven,
        Self::Tied,
        Self::UpUpToSeven,
        Self::UpSevenToFourteen,
        Self::UpOverFourteen,
    ];

    /// Categorizes the score of the offense relative to the defense.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::ScoreDifferential;
    ///
    /// assert_eq!(ScoreDifferential::from_scores(0, 15), ScoreDifferential::DownOverFourteen);
    /// assert_eq!(ScoreDifferential::from_scores(10, 3), ScoreDifferential::UpUpToSeven);
    /// assert_eq!(ScoreDifferential::from_scores(21, 21), ScoreDifferential::Tied);
    /// ```
    #[must_use]
    pub const fn from_scores(own_score: i32, opp_score: i32) -> Self {
        let diff = own_score.saturating_sub(opp_score);
        if diff < -14 {
            Self::DownOverFourteen
        } else if diff < -7 {
            Self::DownSevenToFourteen
        } else if diff < 0 {
            Self::DownUpToSeven
        } else if diff == 0 {
            Self::Tied
        } else if diff <= 7 {
            Self::UpUpToSeven
        } else if diff <= 14 {
            Self::UpSevenToFourteen
        } else {
            Self::UpOverFourteen
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DownOverFourteen => "Down over 14 points",
            Self::DownSevenToFourteen => "Down between 7 and 14 points",
            Self::DownUpToSeven => "Down 7 or less points",
            Self::Tied => "Tied",
            Self::UpUpToSeven => "Up 7 or less points",
            Self::UpSevenToFourteen => "Up between 7 and 14 points",
            Self::UpOverFourteen => "Up over 14 points",
        }
    }
}

impl fmt::Display for ScoreDifferential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical game situation: the lookup key of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Situation {
    pub down: Down,
    pub distance_needed: DistanceNeeded,
    pub field_location: FieldLocation,
    pub time_remaining: TimeRemaining,
    pub score_differential: ScoreDifferential,
}

impl Situation {
    /// Derives a situation from raw game values.
    ///
    /// `yard_line` is the number of yards to the opponent's goal line and
    /// `minutes` the minutes left in the game.
    ///
    /// # Errors
    ///
    /// Returns an error if `down` lies outside `0..=4`.
    pub fn from_raw(
        down: i32,
        distance_needed: i32,
        yard_line: i32,
        minutes: i32,
        own_score: i32,
        opp_score: i32,
    ) -> Result<Self, ConsistencyError> {
        let down = Down::new(down)
            .ok_or_else(|| ConsistencyError::new(format!("down {down} is outside 0..=4")))?;
        Ok(Self {
            down,
            distance_needed: DistanceNeeded::from_yards(distance_needed),
            field_location: FieldLocation::from_yard_line(yard_line),
            time_remaining: TimeRemaining::from_minutes(minutes),
            score_differential: ScoreDifferential::from_scores(own_score, opp_score),
        })
    }

    /// Returns the category index of `attribute` in this situation.
    #[must_use]
    pub const fn value(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::DownNumber => self.down.index(),
            Attribute::DistanceNeeded => self.distance_needed.index(),
            Attribute::FieldLocation => self.field_location.index(),
            Attribute::TimeRemaining => self.time_remaining.index(),
            Attribute::ScoreDifferential => self.score_differential.index(),
        }
    }
}

/// Raw values of one historical play, before categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPlay {
    pub play_type: PlayType,
    pub down: i32,
    /// Yards needed for a first down.
    pub distance_needed: i32,
    /// Yards to the opponent's goal line.
    pub yard_line: i32,
    /// Minutes left in the game.
    pub minutes: i32,
    pub own_score: i32,
    pub opp_score: i32,
    pub distance_gained: i32,
    pub turned_over: bool,
}

/// Stable handle of a record inside its [`RecordStore`](crate::RecordStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(usize);

impl RecordId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One categorized historical play.
///
/// Categories are derived once at insertion and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRecord {
    id: RecordId,
    play_type: PlayType,
    situation: Situation,
    distance_gained: i32,
    turned_over: bool,
}

impl PlayRecord {
    pub(crate) fn from_raw(id: RecordId, raw: &RawPlay) -> Result<Self, ConsistencyError> {
        let situation = Situation::from_raw(
            raw.down,
            raw.distance_needed,
            raw.yard_line,
            raw.minutes,
            raw.own_score,
            raw.opp_score,
        )?;
        Ok(Self {
            id,
            play_type: raw.play_type,
            situation,
            distance_gained: raw.distance_gained,
            turned_over: raw.turned_over,
        })
    }

    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub fn play_type(&self) -> PlayType {
        self.play_type
    }

    #[must_use]
    pub fn situation(&self) -> &Situation {
        &self.situation
    }

    #[must_use]
    pub fn distance_gained(&self) -> i32 {
        self.distance_gained
    }

    #[must_use]
    pub fn turned_over(&self) -> bool {
        self.turned_over
    }
}
