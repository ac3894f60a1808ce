//! Fixed-width calendar text.
//!
//! Every renderer here works on the business weeks enclosing a range (see
//! [`DayRange::round_to_monday_and_friday`]). One column is printed per
//! business day and one separator column per weekend, so headers and bars
//! for the same outer range always line up.

use crate::date::CalendarDate;
use crate::range::DayRange;
use colored::{Color, Colorize};

const TODAY_PLAIN: char = '+';
const TODAY_COLOR: char = '⬤';
const ARROW_RIGHT_SMALL: char = '→';
const ARROW_LEFT_SMALL: char = '←';
const ARROW_RIGHT_BIG: char = '▷';
const ARROW_LEFT_BIG: char = '◁';
const CIRCLE_OPEN: char = '○';
const VERT_BAR: char = '│';
const HYPHEN: char = '-';
const EMPTY_SPACE: char = ' ';
// A leading 0 reads badly next to the digit before it.
const ZERO_PLACEHOLDER: char = '_';

const MIN_HERO_LEN: usize = 5;

/// How an intersection bar is drawn.
///
/// The plain style uses ASCII-ish markers. The colored style paints the
/// bar in `color` and spells it with the characters of `assignee`, cycling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BarStyle {
    /// Bar color; `None` draws plain markers.
    pub color: Option<Color>,
    /// Name used to spell the bar in colored mode.
    pub assignee: String,
}

impl BarStyle {
    /// Uncolored markers.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Colored bar spelled with `assignee`.
    #[must_use]
    pub fn colored(color: Color, assignee: impl Into<String>) -> Self {
        Self {
            color: Some(color),
            assignee: assignee.into(),
        }
    }
}

struct BarWriter {
    buf: String,
    color: Option<Color>,
    hero: Vec<char>,
    hero_index: usize,
}

impl BarWriter {
    fn new(style: &BarStyle) -> Self {
        Self {
            buf: String::new(),
            color: style.color,
            hero: massage_hero(&style.assignee),
            hero_index: 0,
        }
    }

    fn paint(&mut self, ch: char, color: Color) {
        self.buf.push_str(&ch.to_string().color(color).to_string());
    }

    fn today(&mut self) {
        if self.color.is_some() {
            self.paint(TODAY_COLOR, Color::BrightBlack);
        } else {
            self.buf.push(TODAY_PLAIN);
        }
    }

    fn day(&mut self) {
        match self.color {
            Some(color) => {
                let ch = self.hero[self.hero_index];
                self.paint(ch, color);
                self.hero_index = (self.hero_index + 1) % self.hero.len();
            }
            None => self.buf.push(HYPHEN),
        }
    }

    fn starts_earlier(&mut self) {
        match self.color {
            Some(color) => self.paint(ARROW_LEFT_BIG, color),
            None => self.buf.push(ARROW_LEFT_SMALL),
        }
    }

    fn ends_later(&mut self) {
        match self.color {
            Some(color) => self.paint(ARROW_RIGHT_BIG, color),
            None => self.buf.push(ARROW_RIGHT_SMALL),
        }
    }

    fn separator(&mut self) {
        if self.color.is_some() {
            self.paint(VERT_BAR, Color::BrightBlack);
        } else {
            self.buf.push(VERT_BAR);
        }
    }
}

fn massage_hero(name: &str) -> Vec<char> {
    let mut hero: Vec<char> = name.chars().filter(|c| !c.is_whitespace()).collect();
    let padding = if hero.is_empty() { CIRCLE_OPEN } else { '_' };
    while hero.len() < MIN_HERO_LEN {
        hero.push(padding);
    }
    hero
}

impl DayRange {
    /// Draw this range against the business weeks enclosing `outer`.
    ///
    /// One character per business day: a bar symbol when the day lies in
    /// both ranges, a today marker when it is `today`, a blank otherwise.
    /// Weekends collapse to a single separator (or a today marker when
    /// today falls on that weekend). The first and last columns are arrows
    /// when this range runs past the window on that side.
    #[must_use]
    pub fn as_intersect(&self, outer: &DayRange, today: CalendarDate, style: &BarStyle) -> String {
        let outer = outer.round_to_monday_and_friday();
        let mut w = BarWriter::new(style);
        let mut out_day = outer.start().add_days(-1);
        if self.starts_before(&outer) {
            w.starts_earlier();
        } else {
            w.separator();
        }
        // Flips true on Saturday and back to false on Sunday.
        let mut new_weekend = false;
        for _ in 0..outer.day_count() {
            out_day = out_day.add_days(1);
            if out_day.is_weekend() {
                new_weekend = !new_weekend;
                if new_weekend {
                    let saturday = out_day;
                    let sunday = out_day.add_days(1);
                    if today == saturday || today == sunday {
                        w.today();
                    } else {
                        w.separator();
                    }
                }
                continue;
            }
            if self.contains(out_day) {
                w.day();
            } else if out_day == today {
                w.today();
            } else {
                w.buf.push(EMPTY_SPACE);
            }
        }
        if self.ends_after(&outer) {
            w.ends_later();
        } else {
            w.separator();
        }
        w.buf
    }

    /// Month names positioned over the first business day of each month.
    #[must_use]
    pub fn month_header(&self) -> String {
        let outer = self.round_to_monday_and_friday();
        let mut b = String::from(EMPTY_SPACE);
        let mut out_day = outer.start().add_days(-1);
        let mut prev_month = out_day.month();
        let mut new_weekend = false;
        let mut i = 0;
        while i < outer.day_count() {
            out_day = out_day.add_days(1);
            if prev_month == out_day.month() {
                if out_day.is_weekend() {
                    new_weekend = !new_weekend;
                    if new_weekend {
                        b.push(EMPTY_SPACE);
                    }
                } else {
                    b.push(EMPTY_SPACE);
                }
                i += 1;
                continue;
            }
            // The name eats one day per character.
            let name = out_day.month_name();
            b.push_str(&name);
            for _ in 0..name.len() {
                i += 1;
                if out_day.is_weekend() {
                    new_weekend = !new_weekend;
                }
                out_day = out_day.add_days(1);
            }
            prev_month = out_day.month();
        }
        b
    }

    /// Two header rows: the tens digit of the day (printed only when it
    /// changes) and the ones digit.
    #[must_use]
    pub fn day_headers(&self) -> (String, String) {
        let outer = self.round_to_monday_and_friday();
        let mut tens_row = String::from(EMPTY_SPACE);
        let mut ones_row = String::from(EMPTY_SPACE);
        let mut out_day = outer.start().add_days(-1);
        let mut new_weekend = false;
        let mut last_tens = 'x';
        for _ in 0..outer.day_count() {
            out_day = out_day.add_days(1);
            if out_day.is_weekend() {
                new_weekend = !new_weekend;
                if new_weekend {
                    tens_row.push(EMPTY_SPACE);
                    ones_row.push(EMPTY_SPACE);
                }
                continue;
            }
            let digits = format!("{:02}", out_day.day());
            let bytes = digits.as_bytes();
            let tens = char::from(bytes[0]);
            if tens == last_tens {
                tens_row.push(EMPTY_SPACE);
            } else {
                last_tens = tens;
                tens_row.push(if tens == '0' { ZERO_PLACEHOLDER } else { tens });
            }
            ones_row.push(char::from(bytes[1]));
        }
        tens_row.push(EMPTY_SPACE);
        ones_row.push(EMPTY_SPACE);
        (tens_row, ones_row)
    }
}
