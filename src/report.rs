use crate::config::Config;
use crate::engine::annotations::{Annotation, AnnotationInput, TagLine, emit_annotations};
use crate::engine::math::round_to2;
use crate::engine::metrics::{DisplayMetrics, Validity, compute_display_metrics};
use crate::engine::series::{ChartSeries, SeriesOptions, build_chart_series};
use crate::error::{Error, Result};
use crate::funbox::FunboxRegistry;
use crate::mode::{Difficulty, Mode, ModeRule};
use crate::result::TestResult;
use crate::store::kv::KeyValue;
use crate::store::ledger::{
    Fingerprint, Ledger, RecordMetrics, UpdateOutcome, update_eligible,
};
use crate::units::{SpeedUnit, UnitRegistry};

/// A tag the user had active for the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub display: String,
}

/// Session inputs that accompany the snapshot but are not part of it.
pub struct ResultContext<'a> {
    pub config: &'a Config,
    pub units: &'a UnitRegistry,
    pub funbox: &'a FunboxRegistry,
    pub tags: &'a [Tag],
    /// The user asked for this run to be discarded. Display still happens;
    /// the ledger is never written.
    pub dont_save: bool,
    pub flags: ResultFlags,
}

/// Flags the test runner derives while the test ends.
#[derive(Clone, Debug, Default)]
pub struct ResultFlags {
    /// Set when an expert/master difficulty condition failed the run.
    pub fail_reason: Option<String>,
    pub afk_detected: bool,
    pub is_repeated: bool,
    pub too_short: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PbOutcome {
    pub is_new_best: bool,
    /// Stored speed before this run, canonical wpm.
    pub previous: f64,
    /// Distance to the previous record, in display units.
    pub margin: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagPbOutcome {
    pub tag_id: String,
    pub display: String,
    pub is_new_best: bool,
    pub previous: f64,
    /// Distance to the stored tag record, canonical wpm.
    pub margin: f64,
}

/// Everything a results screen needs from one finished test.
#[derive(Debug)]
pub struct ResultReport {
    pub metrics: DisplayMetrics,
    pub series: ChartSeries,
    pub annotations: Vec<Annotation>,
    /// None only when the ledger was unreachable.
    pub pb: Option<PbOutcome>,
    pub tag_pbs: Vec<TagPbOutcome>,
    pub summary: Vec<String>,
    pub info: Vec<String>,
    /// Set when storage failed and record features were skipped.
    pub degraded: Option<Error>,
}

#[derive(Default)]
struct LedgerPhase {
    best_speed: f64,
    pb: Option<PbOutcome>,
    tag_pbs: Vec<TagPbOutcome>,
    tag_lines: Vec<TagLine>,
}

/// Produce the full report for a finished test and consider it for records.
///
/// Storage failure downgrades the report instead of aborting it: metrics,
/// series, and the summary lines survive, record features are dropped, and
/// `degraded` carries the error.
pub fn finalize_result<S: KeyValue>(
    result: &TestResult,
    ctx: &ResultContext,
    ledger: &mut Ledger<S>,
) -> Result<ResultReport> {
    result.validate()?;
    let unit = ctx.units.get(&ctx.config.speed_unit)?;

    let metrics = compute_display_metrics(result, unit, ctx.config.always_show_decimal_places);
    let mut series = build_chart_series(
        result,
        unit,
        SeriesOptions {
            unsmoothed_raw: ctx.config.unsmoothed_raw,
            start_at_zero: ctx.config.start_graphs_at_zero,
        },
    );

    let fingerprint = Fingerprint::of(result);
    let eligible =
        metrics.validity.valid && update_eligible(result, ctx.funbox, ctx.dont_save);

    let (phase, degraded) = match ledger_phase(result, ctx, ledger, &fingerprint, eligible, unit)
    {
        Ok(phase) => (phase, None),
        Err(err) => {
            tracing::warn!(error = %err, "Ledger unavailable, reporting without records");
            (LedgerPhase::default(), Some(err))
        }
    };

    let input = AnnotationInput {
        funbox_label: ctx.funbox.label_content(&result.funbox),
        best_speed: phase.best_speed,
        tag_lines: &phase.tag_lines,
    };
    let (annotations, bounds) = emit_annotations(&input, series.bounds, unit);
    series.bounds = bounds;

    Ok(ResultReport {
        metrics,
        series,
        annotations,
        pb: phase.pb,
        tag_pbs: phase.tag_pbs,
        summary: summary_lines(result, ctx.funbox),
        info: info_lines(result, &ctx.flags, &metrics.validity),
        degraded,
    })
}

fn ledger_phase<S: KeyValue>(
    result: &TestResult,
    ctx: &ResultContext,
    ledger: &mut Ledger<S>,
    fingerprint: &Fingerprint,
    eligible: bool,
    unit: &SpeedUnit,
) -> Result<LedgerPhase> {
    let best_speed = ledger.lookup_best(fingerprint)?;
    let metrics = RecordMetrics::of(result);

    let outcome = if eligible {
        ledger.consider_update(fingerprint, metrics, result.timestamp)?
    } else {
        UpdateOutcome {
            is_new_best: false,
            previous: best_speed,
        }
    };
    let pb = Some(PbOutcome {
        is_new_best: outcome.is_new_best,
        previous: outcome.previous,
        margin: round_to2(unit.from_wpm((result.speed - outcome.previous).abs())),
    });

    let mut tag_pbs = Vec::with_capacity(ctx.tags.len());
    let mut tag_lines = Vec::new();
    for tag in ctx.tags {
        let tag_best = ledger.lookup_tag_best(&tag.id, fingerprint)?;
        let outcome = if eligible {
            ledger.consider_tag_update(&tag.id, fingerprint, metrics, result.timestamp)?
        } else {
            UpdateOutcome {
                is_new_best: false,
                previous: tag_best,
            }
        };
        if eligible && !outcome.is_new_best {
            tag_lines.push(TagLine {
                display: tag.display.clone(),
                speed: tag_best,
            });
        }
        tag_pbs.push(TagPbOutcome {
            tag_id: tag.id.clone(),
            display: tag.display.clone(),
            is_new_best: outcome.is_new_best,
            previous: outcome.previous,
            margin: round_to2(result.speed - outcome.previous),
        });
    }

    Ok(LedgerPhase {
        best_speed,
        pb,
        tag_pbs,
        tag_lines,
    })
}

/// Test-type summary, one line per attribute, in display order.
pub fn summary_lines(result: &TestResult, funbox: &FunboxRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(ModeRule::for_test(result.mode, &result.submode).heading());

    let ignores_language = funbox.any_ignores_language(&result.funbox);
    if result.mode != Mode::Custom && !ignores_language {
        lines.push(result.language.replace('_', " "));
    }
    if result.punctuation {
        lines.push("punctuation".to_string());
    }
    if result.numbers {
        lines.push("numbers".to_string());
    }
    if result.blind {
        lines.push("blind".to_string());
    }
    if result.lazy_mode {
        lines.push("lazy".to_string());
    }
    if !result.funbox.is_empty() {
        let names: Vec<String> = result
            .funbox
            .iter()
            .map(|name| name.replace('_', " "))
            .collect();
        lines.push(names.join(", "));
    }
    match result.difficulty {
        Difficulty::Normal => {}
        Difficulty::Expert => lines.push("expert".to_string()),
        Difficulty::Master => lines.push("master".to_string()),
    }
    lines
}

/// Diagnostic lines. Every applicable line is included, in a fixed order.
pub fn info_lines(result: &TestResult, flags: &ResultFlags, validity: &Validity) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(reason) = &flags.fail_reason {
        lines.push(format!("failed ({reason})"));
    }
    if flags.afk_detected {
        lines.push("afk detected".to_string());
    }
    if !validity.valid {
        let mut fields = Vec::new();
        if validity.speed_out_of_range {
            fields.push("wpm");
        }
        if validity.raw_out_of_range {
            fields.push("raw");
        }
        if validity.accuracy_out_of_range {
            fields.push("accuracy");
        }
        lines.push(format!("invalid ({})", fields.join(",")));
    }
    if flags.is_repeated {
        lines.push("repeated".to_string());
    }
    if result.bailed_out {
        lines.push("bailed out".to_string());
    }
    if flags.too_short {
        lines.push("too short".to_string());
    }
    lines
}
