use super::document::LoginMethod;
use super::events::{EventSink, WidgetEvent};
use server::community::ConnectionTarget;
use std::collections::HashSet;

/// Login methods last reported by the community service, and the target
/// they were reported for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodList {
    pub items: Vec<LoginMethod>,
    pub fetched_for: Option<ConnectionTarget>,
}

/// Owns the method list fetch and reconciles its result with the selector.
///
/// A target is fetched when it is confirmed and neither holds the current
/// list nor has a fetch outstanding. A fetch stops being outstanding when its
/// answer arrives, is superseded, or fails, so confirming the same target
/// again later fetches again.
#[derive(Clone, Debug, Default)]
pub struct MethodListSynchronizer {
    list: MethodList,
    in_flight: HashSet<ConnectionTarget>,
    last_requested: Option<ConnectionTarget>,
}

impl MethodListSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the cached list and every outstanding request.
    pub fn reset(&mut self) {
        self.list = MethodList::default();
        self.in_flight.clear();
        self.last_requested = None;
    }

    /// Asks the collaborator for the methods of `target`, unless its list is
    /// already held or a fetch for it is outstanding. Returns whether a
    /// request was issued.
    pub fn request_for(&mut self, target: &ConnectionTarget, sink: &dyn EventSink) -> bool {
        if self.has_list_for(target) {
            log::debug!("Security types for {target} already loaded, skipping fetch");
            return false;
        }
        if !self.in_flight.insert(target.clone()) {
            log::debug!("Security types for {target} already requested, skipping fetch");
            return false;
        }

        log::debug!("Requesting security types for {target}");
        self.last_requested = Some(target.clone());
        sink.emit(WidgetEvent::FetchSecurityTypes(target.clone()));
        true
    }

    /// The target a list delivery will be attributed to.
    pub fn last_requested(&self) -> Option<&ConnectionTarget> {
        self.last_requested.as_ref()
    }

    /// Closes the outstanding fetch for `target` without touching the list.
    /// Used when the fetch failed or its answer was superseded.
    pub fn on_fetch_finished(&mut self, target: &ConnectionTarget) {
        if self.in_flight.remove(target) {
            log::debug!("Security types fetch for {target} closed without a list");
        }
    }

    /// Replaces the cached list with a new delivery from the collaborator.
    ///
    /// Duplicates are dropped while keeping the service's ordering. The
    /// delivery is attributed to the most recently requested target and
    /// closes its outstanding fetch.
    pub fn on_list_changed(&mut self, items: Vec<String>) {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .map(LoginMethod::from)
            .collect();

        if let Some(target) = &self.last_requested {
            self.in_flight.remove(target);
        }
        self.list = MethodList {
            items,
            fetched_for: self.last_requested.clone(),
        };
    }

    pub fn list(&self) -> &MethodList {
        &self.list
    }

    pub fn has_list_for(&self, target: &ConnectionTarget) -> bool {
        self.list.fetched_for.as_ref() == Some(target)
    }

    /// Options to display: fetched items in service order, then the selected
    /// method if the service did not report it.
    pub fn options(&self, selected: Option<&LoginMethod>) -> Vec<LoginMethod> {
        let mut options = self.list.items.clone();
        if let Some(selected) = selected {
            if !options.contains(selected) {
                options.push(selected.clone());
            }
        }
        options
    }

    /// The selector is usable only for a non-external method, on a target the
    /// service confirmed, once that target's method list has arrived.
    pub fn selector_enabled(
        &self,
        live: &ConnectionTarget,
        method: Option<&LoginMethod>,
        confirmed: bool,
    ) -> bool {
        let external = method.is_some_and(LoginMethod::is_external);
        !external && confirmed && self.has_list_for(live)
    }
}
