use std::sync::Arc;

use log::debug;

use crate::data::category::{AgeCategory, BmiCategory, DistanceCategory};
use crate::data::filter::{Selection, SelectionOptions};
use crate::data::model::PreparedTable;
use crate::projector::DashboardView;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Host-side dashboard state, independent of any rendering.
///
/// Holds a shared read-only handle to the table, the current selection and
/// the last published view. Selection changes are dispatched one at a time;
/// a view computed for an older dispatch is never published over a newer one.
pub struct DashboardState {
    table: Arc<PreparedTable>,

    /// What the three dropdowns may offer.
    options: SelectionOptions,

    /// Most recently dispatched selection.
    selection: Selection,

    /// Incremented on every dispatch.
    generation: u64,

    /// Generation of the view currently on screen.
    published_generation: u64,

    view: DashboardView,
}

/// A dispatched selection waiting to be projected.
#[derive(Debug, Clone)]
pub struct PendingProjection {
    table: Arc<PreparedTable>,
    selection: Selection,
    generation: u64,
}

/// A computed view tagged with the dispatch it answers.
#[derive(Debug, Clone)]
pub struct ProjectedView {
    pub generation: u64,
    pub view: DashboardView,
}

impl PendingProjection {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Compute the view. Pure; may run anywhere the ticket is moved to.
    pub fn run(self) -> ProjectedView {
        ProjectedView {
            generation: self.generation,
            view: DashboardView::build(&self.table, &self.selection),
        }
    }
}

impl DashboardState {
    /// Start with the default selection for `table` and its view.
    pub fn new(table: Arc<PreparedTable>) -> Self {
        let options = SelectionOptions::from_table(&table);
        let selection = options.default_selection();
        let view = DashboardView::build(&table, &selection);
        DashboardState {
            table,
            options,
            selection,
            generation: 0,
            published_generation: 0,
            view,
        }
    }

    pub fn table(&self) -> &Arc<PreparedTable> {
        &self.table
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The view currently on screen.
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Record a new selection and hand out the work to project it.
    pub fn dispatch(&mut self, selection: Selection) -> PendingProjection {
        self.generation += 1;
        self.selection = selection;
        PendingProjection {
            table: Arc::clone(&self.table),
            selection,
            generation: self.generation,
        }
    }

    /// Install a computed view unless a newer dispatch has superseded it.
    /// Returns whether the view was published.
    pub fn publish(&mut self, projected: ProjectedView) -> bool {
        if projected.generation != self.generation {
            debug!(
                "discarding stale view #{} (latest dispatch is #{})",
                projected.generation, self.generation
            );
            return false;
        }
        self.published_generation = projected.generation;
        self.view = projected.view;
        true
    }

    /// Whether the view on screen answers the latest dispatch.
    pub fn is_current(&self) -> bool {
        self.published_generation == self.generation
    }

    /// Dispatch, project and publish in one step.
    pub fn select(&mut self, selection: Selection) -> &DashboardView {
        let projected = self.dispatch(selection).run();
        self.publish(projected);
        &self.view
    }

    pub fn set_age(&mut self, age: AgeCategory) -> &DashboardView {
        self.select(Selection { age, ..self.selection })
    }

    pub fn set_distance(&mut self, distance: DistanceCategory) -> &DashboardView {
        self.select(Selection { distance, ..self.selection })
    }

    pub fn set_bmi(&mut self, bmi: BmiCategory) -> &DashboardView {
        self.select(Selection { bmi, ..self.selection })
    }
}
