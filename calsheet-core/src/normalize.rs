//! Row to DisplayEvent transformation.

use crate::color::assign_color;
use crate::datetime::{format_clock, parse_date, parse_datetime};
use crate::error::CalsheetResult;
use crate::event::{DisplayEvent, Icon};
use crate::icon::{IconResolver, IconResult};
use crate::row::{SourceRow, non_empty};
use crate::settings::{Settings, SubtitleRule, TitleSettings};

/// Title size lost per character of title.
pub const TITLE_SIZE_SLOPE: f64 = -0.1671533;

/// Title size divided by this gives the spacer size.
pub const SPACER_RATIO: f64 = 8.5;

/// Builds DisplayEvents from rows with a fixed set of settings.
pub struct Normalizer<'a> {
    settings: &'a Settings,
    icons: IconResolver,
    rng: fastrand::Rng,
}

impl<'a> Normalizer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self::with_rng(settings, fastrand::Rng::new())
    }

    /// Normalizer with a caller-provided random source for generated colors.
    pub fn with_rng(settings: &'a Settings, rng: fastrand::Rng) -> Self {
        Normalizer {
            settings,
            icons: IconResolver::from_settings(settings),
            rng,
        }
    }

    /// Normalize one row. `row_number` is 1-based and only used in errors.
    pub fn normalize(&mut self, row: &SourceRow, row_number: usize) -> CalsheetResult<DisplayEvent> {
        let date = parse_date(&row.date, row_number)?;
        let start = parse_datetime(&row.start, date, row_number, "START")?;
        let end = non_empty(&row.end)
            .map(|end| parse_datetime(end, date, row_number, "END"))
            .transpose()?;

        let start_time = format_clock(&start);
        let end_time = end.as_ref().map(format_clock);
        let time_range = match &end_time {
            Some(end_time) => format!("{}-{}", start_time, end_time),
            None => start_time.clone(),
        };

        let event_type = match non_empty(&row.subtype) {
            Some(subtype) => format!("{} - {}", row.event_type, subtype),
            None => row.event_type.clone(),
        };

        let subtitle = non_empty(&row.subtitle).map(str::to_string);
        let title_size = title_size(&row.title, subtitle.is_some(), &self.settings.title);

        Ok(DisplayEvent {
            date,
            dow: date.format("%a").to_string(),
            day: date.format("%-d").to_string(),
            event_type,
            name: row.title.clone(),
            subtitle,
            icon: self.icon_for(&row.icon),
            start_time,
            end_time,
            time_range,
            color: assign_color(&row.color, &self.settings.color, &mut self.rng),
            title_size,
            spacer_size: spacer_size(title_size),
        })
    }

    /// Normalize every row in order. The first bad date aborts the run.
    pub fn normalize_all(&mut self, rows: &[SourceRow]) -> CalsheetResult<Vec<DisplayEvent>> {
        let events = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.normalize(row, i + 1))
            .collect::<CalsheetResult<Vec<_>>>()?;

        log::info!("Normalized {} events", events.len());
        Ok(events)
    }

    /// Icon failures never fail the row.
    fn icon_for(&self, cell: &Option<String>) -> Option<Icon> {
        let identifier = non_empty(cell)?;

        match self.icons.resolve(identifier) {
            Ok(IconResult::VectorMarkup(markup)) => Some(Icon::Svg(markup)),
            Ok(IconResult::RasterPath(path)) => {
                log::debug!("Using raster icon {}", path.display());
                Some(Icon::Image(path))
            }
            Ok(IconResult::NotFound) => {
                log::warn!("Icon not found: {}", identifier);
                None
            }
            Err(e) => {
                log::warn!("Icon unusable: {}: {}", identifier, e);
                None
            }
        }
    }
}

/// Normalize rows with a fresh random source.
pub fn normalize_all(rows: &[SourceRow], settings: &Settings) -> CalsheetResult<Vec<DisplayEvent>> {
    Normalizer::new(settings).normalize_all(rows)
}

/// Title font size in em for a title of this length.
pub fn title_size(title: &str, has_subtitle: bool, settings: &TitleSettings) -> f64 {
    if has_subtitle && settings.subtitle == SubtitleRule::ForceMinimum {
        return settings.min;
    }

    let length = title.chars().count() as f64;
    (TITLE_SIZE_SLOPE * length + settings.base)
        .max(settings.min)
        .min(settings.max)
}

pub fn spacer_size(title_size: f64) -> f64 {
    title_size / SPACER_RATIO
}
