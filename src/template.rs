use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{DayDirsError, Result};

/// Weekday names indexed by days since Monday.
pub const WEEKDAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

pub const DEFAULT_TEMPLATE: &str = "{iso}_{weekday}";

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("valid token regex"));

// `[[fill]align][width][.precision][s]`, the string subset of Python's format spec.
static SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(.)?([<>^]))?([0-9]*)(?:\.([0-9]+))?s?$").expect("valid spec regex")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placeholder {
    Iso,
    Day,
    Month,
    Year,
    Weekday,
}

impl Placeholder {
    const ALL: [Placeholder; 5] = [
        Self::Iso,
        Self::Day,
        Self::Month,
        Self::Year,
        Self::Weekday,
    ];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "iso" => Some(Self::Iso),
            "dd" => Some(Self::Day),
            "mm" => Some(Self::Month),
            "yyyy" => Some(Self::Year),
            "weekday" => Some(Self::Weekday),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::Day => "dd",
            Self::Month => "mm",
            Self::Year => "yyyy",
            Self::Weekday => "weekday",
        }
    }

    fn expected_list() -> String {
        Self::ALL
            .iter()
            .map(|field| format!("{{{}}}", field.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn value(&self, date: NaiveDate) -> String {
        match self {
            Self::Iso => date.format("%Y-%m-%d").to_string(),
            Self::Day => format!("{:02}", date.day()),
            Self::Month => format!("{:02}", date.month()),
            Self::Year => date.year().to_string(),
            Self::Weekday => weekday_name(date).to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Align {
    Left,
    Right,
    Center,
}

/// Padding and truncation applied to a rendered field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FieldSpec {
    fill: char,
    align: Align,
    width: usize,
    precision: Option<usize>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Left,
            width: 0,
            precision: None,
        }
    }
}

impl FieldSpec {
    fn parse(spec: &str) -> Option<Self> {
        let caps = SPEC.captures(spec)?;
        let mut parsed = Self::default();
        if let Some(fill) = caps.get(1) {
            parsed.fill = fill.as_str().chars().next()?;
        }
        if let Some(align) = caps.get(2) {
            parsed.align = match align.as_str() {
                "<" => Align::Left,
                ">" => Align::Right,
                _ => Align::Center,
            };
        }
        let width = caps.get(3).map_or("", |m| m.as_str());
        if !width.is_empty() {
            parsed.width = width.parse().ok()?;
        }
        if let Some(precision) = caps.get(4) {
            parsed.precision = Some(precision.as_str().parse().ok()?);
        }
        Some(parsed)
    }

    fn apply(&self, value: &str, out: &mut String) {
        let value = match self.precision {
            Some(max) => value.chars().take(max).collect::<String>(),
            None => value.to_owned(),
        };
        let pad = self.width.saturating_sub(value.chars().count());
        let (before, after) = match self.align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        out.extend(std::iter::repeat_n(self.fill, before));
        out.push_str(&value);
        out.extend(std::iter::repeat_n(self.fill, after));
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Field {
    placeholder: Placeholder,
    spec: FieldSpec,
}

impl Field {
    /// Parse the inside of `{...}`: `name[!s][:spec]`.
    fn parse(raw: &str, inner: &str) -> Result<Self> {
        let (head, spec) = match inner.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (inner, None),
        };
        let (name, conversion) = match head.split_once('!') {
            Some((name, conversion)) => (name, Some(conversion)),
            None => (head, None),
        };

        let placeholder = Placeholder::from_name(name).ok_or_else(|| {
            DayDirsError::format(
                raw,
                format!(
                    "unknown placeholder `{{{}}}`; expected one of {}",
                    name,
                    Placeholder::expected_list()
                ),
            )
        })?;

        if let Some(conversion) = conversion
            && conversion != "s"
        {
            return Err(DayDirsError::format(
                raw,
                format!(
                    "conversion `!{}` on `{{{}}}` is not supported; only `!s` is",
                    conversion, name
                ),
            ));
        }

        let spec = match spec {
            Some(spec) => FieldSpec::parse(spec).ok_or_else(|| {
                DayDirsError::format(
                    raw,
                    format!(
                        "format spec `:{}` on `{{{}}}` is not supported; use [[fill]align][width][.precision]",
                        spec, name
                    ),
                )
            })?,
            None => FieldSpec::default(),
        };

        Ok(Self { placeholder, spec })
    }

    fn write(&self, date: NaiveDate, out: &mut String) {
        self.spec.apply(&self.placeholder.value(date), out);
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_monday() as usize]
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A folder name format such as `{iso}_{weekday}`, validated up front so
/// rendering cannot fail halfway through a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NameTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl NameTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut cursor = 0;

        for caps in TOKEN.captures_iter(raw) {
            let token = caps.get_match();
            push_literal(raw, &raw[cursor..token.start()], &mut literal)?;
            cursor = token.end();

            match caps.get(1) {
                Some(inner) => {
                    let field = Field::parse(raw, inner.as_str())?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                None if token.as_str() == "{{" => literal.push('{'),
                None => literal.push('}'),
            }
        }

        push_literal(raw, &raw[cursor..], &mut literal)?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    pub fn render(&self, date: NaiveDate) -> String {
        let mut out = String::with_capacity(self.raw.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => field.write(date, &mut out),
            }
        }
        out
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self {
            raw: DEFAULT_TEMPLATE.to_owned(),
            segments: vec![
                Segment::Field(Field {
                    placeholder: Placeholder::Iso,
                    spec: FieldSpec::default(),
                }),
                Segment::Literal("_".to_owned()),
                Segment::Field(Field {
                    placeholder: Placeholder::Weekday,
                    spec: FieldSpec::default(),
                }),
            ],
        }
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn push_literal(raw: &str, text: &str, literal: &mut String) -> Result<()> {
    if text.contains('{') {
        return Err(DayDirsError::format(raw, "single `{` encountered; use `{{` for a literal brace"));
    }
    if text.contains('}') {
        return Err(DayDirsError::format(raw, "single `}` encountered; use `}}` for a literal brace"));
    }
    literal.push_str(text);
    Ok(())
}

/// Render one folder name without keeping the parsed template around.
pub fn render_folder_name(date: NaiveDate, template: &str) -> Result<String> {
    Ok(NameTemplate::parse(template)?.render(date))
}
