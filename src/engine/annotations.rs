use crate::engine::math::round_to2;
use crate::engine::series::ScaleBounds;
use crate::units::SpeedUnit;

/// Span around the record line (20 wpm, converted) that the chart max must
/// clear, so the line is not drawn against the top edge.
const PB_CLEARANCE_WPM: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    FunboxLabel,
    PersonalBest,
    TagBest,
}

/// Where the renderer anchors the label along the annotation line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSide {
    Start,
    Center,
    End,
}

/// One horizontal line directive for the results chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Position on the speed scale, in display units.
    pub value: f64,
    pub text: String,
    pub side: LabelSide,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagLine {
    pub display: String,
    /// Stored tag record, canonical wpm.
    pub speed: f64,
}

pub struct AnnotationInput<'a> {
    /// Combined funbox label, empty when no funbox was active.
    pub funbox_label: String,
    /// Stored best for the fingerprint before this result was considered,
    /// canonical wpm. Zero means no record and suppresses the line.
    pub best_speed: f64,
    /// Tags whose stored record was not beaten by this result.
    pub tag_lines: &'a [TagLine],
}

/// Produce the ordered annotation list and the (possibly raised) bounds.
/// Deterministic: the same input always yields the same directives.
pub fn emit_annotations(
    input: &AnnotationInput,
    bounds: ScaleBounds,
    unit: &SpeedUnit,
) -> (Vec<Annotation>, ScaleBounds) {
    let mut annotations = Vec::new();
    let mut bounds = bounds;

    if !input.funbox_label.is_empty() {
        annotations.push(Annotation {
            kind: AnnotationKind::FunboxLabel,
            value: bounds.min,
            text: input.funbox_label.clone(),
            side: LabelSide::Start,
        });
    }

    if input.best_speed != 0.0 {
        let line_value = unit.convert(input.best_speed);
        annotations.push(Annotation {
            kind: AnnotationKind::PersonalBest,
            value: line_value,
            text: format!("PB: {line_value:.2}"),
            side: LabelSide::Center,
        });
        let clearance = unit.from_wpm(PB_CLEARANCE_WPM);
        if bounds.max >= line_value - clearance && bounds.max <= line_value + clearance {
            bounds.max = (line_value + clearance).round();
        }
    }

    let mut side = LabelSide::Start;
    for line in input.tag_lines {
        let value = unit.from_wpm(line.speed);
        annotations.push(Annotation {
            kind: AnnotationKind::TagBest,
            value,
            text: format!("{} PB: {:.2}", line.display, round_to2(value)),
            side,
        });
        side = match side {
            LabelSide::Start => LabelSide::End,
            _ => LabelSide::Start,
        };
    }

    (annotations, bounds)
}
