use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartSpec, Theme};
use crate::dataset::Dataset;
use crate::derive::{self, DeriveContext, Derived, Quirks};
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Selection,
}

/// Output slots on the page. Serialized names are the DOM ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotId {
    #[serde(rename = "card1")]
    HomeTeam,
    #[serde(rename = "card2")]
    AwayTeam,
    #[serde(rename = "score-card1")]
    HomeScore,
    #[serde(rename = "score-card2")]
    AwayScore,
    #[serde(rename = "pie-chart")]
    AttemptsChart,
    #[serde(rename = "bar-chart")]
    PassesChart,
    #[serde(rename = "possession-chart")]
    PossessionChart,
    #[serde(rename = "fouls-chart")]
    FoulsChart,
    #[serde(rename = "freekick-chart")]
    FreeKicksChart,
    #[serde(rename = "goalsprevented-chart")]
    GoalPreventionsChart,
}

impl SlotId {
    pub const ALL: [SlotId; 10] = [
        SlotId::HomeTeam,
        SlotId::AwayTeam,
        SlotId::HomeScore,
        SlotId::AwayScore,
        SlotId::AttemptsChart,
        SlotId::PassesChart,
        SlotId::PossessionChart,
        SlotId::FoulsChart,
        SlotId::FreeKicksChart,
        SlotId::GoalPreventionsChart,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            SlotId::HomeTeam => "card1",
            SlotId::AwayTeam => "card2",
            SlotId::HomeScore => "score-card1",
            SlotId::AwayScore => "score-card2",
            SlotId::AttemptsChart => "pie-chart",
            SlotId::PassesChart => "bar-chart",
            SlotId::PossessionChart => "possession-chart",
            SlotId::FoulsChart => "fouls-chart",
            SlotId::FreeKicksChart => "freekick-chart",
            SlotId::GoalPreventionsChart => "goalsprevented-chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    Pair,
    Chart,
}

impl OutputShape {
    pub fn arity(self) -> usize {
        match self {
            OutputShape::Pair => 2,
            OutputShape::Chart => 1,
        }
    }
}

pub type DeriveFn = fn(&DeriveContext<'_>, i64) -> DashboardResult<Derived>;

#[derive(Clone, Copy)]
pub struct Binding {
    pub name: &'static str,
    pub inputs: &'static [Signal],
    pub outputs: &'static [SlotId],
    pub shape: OutputShape,
    pub derive: DeriveFn,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("shape", &self.shape)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BindingInfo {
    pub name: &'static str,
    pub inputs: Vec<Signal>,
    pub outputs: Vec<SlotId>,
    pub shape: OutputShape,
}

fn team_labels(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    let (away, home) = derive::derive_team_labels(ctx.dataset, index)?;
    Ok(Derived::Pair(away, home))
}

fn score(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    let (away, home) = derive::derive_score(ctx.dataset, index, ctx.quirks)?;
    Ok(Derived::Pair(away, home))
}

fn attempts(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_attempts_chart(ctx.dataset, index, ctx.theme).map(Derived::Chart)
}

fn passes(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_passes_chart(ctx.dataset, index, ctx.theme).map(Derived::Chart)
}

fn possession(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_possession_chart(ctx.dataset, index, ctx.theme).map(Derived::Chart)
}

fn fouls(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_fouls_chart(ctx.dataset, index, ctx.theme).map(Derived::Chart)
}

fn free_kicks(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_free_kicks_chart(ctx.dataset, index, ctx.theme, ctx.quirks).map(Derived::Chart)
}

fn goal_preventions(ctx: &DeriveContext<'_>, index: i64) -> DashboardResult<Derived> {
    derive::derive_goal_preventions_chart(ctx.dataset, index, ctx.theme).map(Derived::Chart)
}

const SELECTION: &[Signal] = &[Signal::Selection];

const STANDARD_BINDINGS: [Binding; 8] = [
    Binding {
        name: "team_labels",
        inputs: SELECTION,
        outputs: &[SlotId::AwayTeam, SlotId::HomeTeam],
        shape: OutputShape::Pair,
        derive: team_labels,
    },
    Binding {
        name: "score",
        inputs: SELECTION,
        outputs: &[SlotId::AwayScore, SlotId::HomeScore],
        shape: OutputShape::Pair,
        derive: score,
    },
    Binding {
        name: "attempts",
        inputs: SELECTION,
        outputs: &[SlotId::AttemptsChart],
        shape: OutputShape::Chart,
        derive: attempts,
    },
    Binding {
        name: "passes",
        inputs: SELECTION,
        outputs: &[SlotId::PassesChart],
        shape: OutputShape::Chart,
        derive: passes,
    },
    Binding {
        name: "possession",
        inputs: SELECTION,
        outputs: &[SlotId::PossessionChart],
        shape: OutputShape::Chart,
        derive: possession,
    },
    Binding {
        name: "fouls",
        inputs: SELECTION,
        outputs: &[SlotId::FoulsChart],
        shape: OutputShape::Chart,
        derive: fouls,
    },
    Binding {
        name: "free_kicks",
        inputs: SELECTION,
        outputs: &[SlotId::FreeKicksChart],
        shape: OutputShape::Chart,
        derive: free_kicks,
    },
    Binding {
        name: "goal_preventions",
        inputs: SELECTION,
        outputs: &[SlotId::GoalPreventionsChart],
        shape: OutputShape::Chart,
        derive: goal_preventions,
    },
];

#[derive(Debug, Clone)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
}

impl BindingRegistry {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_BINDINGS.to_vec())
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn bindings_for(&self, signal: Signal) -> impl Iterator<Item = &Binding> {
        self.bindings
            .iter()
            .filter(move |b| b.inputs.contains(&signal))
    }

    pub fn describe(&self) -> Vec<BindingInfo> {
        self.bindings
            .iter()
            .map(|b| BindingInfo {
                name: b.name,
                inputs: b.inputs.to_vec(),
                outputs: b.outputs.to_vec(),
                shape: b.shape,
            })
            .collect()
    }

    /// Every slot must be written by exactly one binding, and each binding must
    /// declare as many outputs as its shape produces.
    pub fn validate(&self) -> DashboardResult<()> {
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if binding.inputs.is_empty() {
                return Err(DashboardError::InvalidRegistry(format!(
                    "binding `{}` has no inputs",
                    binding.name
                )));
            }
            if binding.outputs.len() != binding.shape.arity() {
                return Err(DashboardError::InvalidRegistry(format!(
                    "binding `{}` declares {} outputs for a {:?} deriver",
                    binding.name,
                    binding.outputs.len(),
                    binding.shape
                )));
            }
            for slot in binding.outputs {
                if !seen.insert(*slot) {
                    return Err(DashboardError::InvalidRegistry(format!(
                        "slot `{}` is bound more than once",
                        slot.dom_id()
                    )));
                }
            }
        }
        if let Some(unbound) = SlotId::ALL.iter().find(|slot| !seen.contains(*slot)) {
            return Err(DashboardError::InvalidRegistry(format!(
                "slot `{}` has no binding",
                unbound.dom_id()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotValue {
    Empty,
    Text { text: String },
    Chart { chart: ChartSpec },
    Failed { error: String },
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartSpec> {
        match self {
            SlotValue::Chart { chart } => Some(chart),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SlotValue::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    index: usize,
}

impl SelectionState {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub selection: usize,
    pub generation: u64,
    pub slots: BTreeMap<SlotId, SlotValue>,
}

static EMPTY_SLOT: SlotValue = SlotValue::Empty;

impl Snapshot {
    pub fn slot(&self, slot: SlotId) -> &SlotValue {
        self.slots.get(&slot).unwrap_or(&EMPTY_SLOT)
    }
}

/// Owns the selection and the values currently shown in every slot.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    theme: Theme,
    quirks: Quirks,
    registry: BindingRegistry,
    selection: SelectionState,
    slots: BTreeMap<SlotId, SlotValue>,
    generation: u64,
}

impl Dashboard {
    pub fn new(
        dataset: Arc<Dataset>,
        theme: Theme,
        quirks: Quirks,
        registry: BindingRegistry,
    ) -> DashboardResult<Self> {
        registry.validate()?;
        let mut dashboard = Self {
            dataset,
            theme,
            quirks,
            registry,
            selection: SelectionState::default(),
            slots: SlotId::ALL.iter().map(|s| (*s, SlotValue::Empty)).collect(),
            generation: 0,
        };
        dashboard.select(0)?;
        Ok(dashboard)
    }

    pub fn with_defaults(dataset: Arc<Dataset>, quirks: Quirks) -> DashboardResult<Self> {
        Self::new(dataset, Theme::default(), quirks, BindingRegistry::standard())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            selection: self.selection.index,
            generation: self.generation,
            slots: self.slots.clone(),
        }
    }

    /// Applies a new selection. An out-of-range index leaves every slot and
    /// the generation untouched.
    pub fn select(&mut self, index: i64) -> DashboardResult<Snapshot> {
        let idx = match self.dataset.check_index(index) {
            Ok(idx) => idx,
            Err(err) => {
                tracing::warn!(index, len = self.dataset.len(), "ignoring selection: {err}");
                return Err(err);
            }
        };
        self.selection.index = idx;
        let updates = self.recompute(Signal::Selection, index);
        for (slot, value) in updates {
            self.slots.insert(slot, value);
        }
        self.generation += 1;
        tracing::debug!(index = idx, generation = self.generation, "selection applied");
        Ok(self.snapshot())
    }

    fn recompute(&self, signal: Signal, index: i64) -> Vec<(SlotId, SlotValue)> {
        let ctx = DeriveContext {
            dataset: &self.dataset,
            theme: &self.theme,
            quirks: self.quirks,
        };
        let mut updates = Vec::new();
        for binding in self.registry.bindings_for(signal) {
            let result = (binding.derive)(&ctx, index);
            updates.extend(route(binding, result));
        }
        updates
    }
}

fn route(binding: &Binding, result: DashboardResult<Derived>) -> Vec<(SlotId, SlotValue)> {
    let failed = |err: &DashboardError| {
        binding
            .outputs
            .iter()
            .map(|slot| {
                (
                    *slot,
                    SlotValue::Failed {
                        error: err.to_string(),
                    },
                )
            })
            .collect::<Vec<_>>()
    };

    match result {
        Ok(derived) if derived.arity() != binding.outputs.len() => {
            let err = DashboardError::InvalidRegistry(format!(
                "binding `{}` produced {} values for {} slots",
                binding.name,
                derived.arity(),
                binding.outputs.len()
            ));
            tracing::error!(binding = binding.name, "{err}");
            failed(&err)
        }
        Ok(Derived::Pair(first, second)) => vec![
            (binding.outputs[0], SlotValue::Text { text: first }),
            (binding.outputs[1], SlotValue::Text { text: second }),
        ],
        Ok(Derived::Chart(chart)) => vec![(binding.outputs[0], SlotValue::Chart { chart })],
        Err(err @ DashboardError::ShapeMismatch { .. }) => {
            tracing::error!(binding = binding.name, "{err}");
            failed(&err)
        }
        Err(err) => {
            tracing::warn!(binding = binding.name, "{err}");
            failed(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SlotId;

    #[test]
    fn dom_ids_match_serialized_slot_names() {
        for slot in SlotId::ALL {
            let value = serde_json::to_value(slot).unwrap();
            assert_eq!(value, slot.dom_id(), "{slot:?}");
            let back: SlotId = serde_json::from_value(value).unwrap();
            assert_eq!(back, slot);
        }
    }
}
