//! Date of birth in words, as printed on the registration form.

use jiff::civil::Date;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: i8) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// `2015-03-21` becomes `21st March 2015`.
pub fn date_to_words(date: Date) -> String {
    let month = MONTHS[(date.month() - 1) as usize];
    format!(
        "{}{} {} {}",
        date.day(),
        ordinal_suffix(date.day()),
        month,
        date.year()
    )
}
