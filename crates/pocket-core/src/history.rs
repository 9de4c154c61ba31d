//! Navigation history: the back-stack of foreground views.

/// Identifier of the home screen view.
pub const HOME_SCREEN: &str = "homeScreen";
/// Recents (app switcher) pseudo-view. Shown, never recorded.
pub const RECENT_APPS_VIEW: &str = "recentAppsView";
/// App drawer pseudo-view. Shown, never recorded.
pub const ALL_APPS_VIEW: &str = "allAppsView";

/// Default maximum depth.
pub const DEFAULT_LIMIT: usize = 20;

/// Whether `app_id` is a transient pseudo-view.
pub fn is_pseudo_view(app_id: &str) -> bool {
    app_id == RECENT_APPS_VIEW || app_id == ALL_APPS_VIEW
}

/// Bounded stack of app identifiers, oldest first.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    limit: usize,
}

impl NavigationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record `app_id` as the new foreground view.
    ///
    /// Ignores pseudo-views and repeats of the current top. Going home from
    /// any other view resets the stack to `[homeScreen]`.
    pub fn push(&mut self, app_id: &str) {
        if is_pseudo_view(app_id) || self.top() == Some(app_id) {
            return;
        }
        if app_id == HOME_SCREEN && !self.entries.is_empty() {
            self.entries.clear();
            self.entries.push(HOME_SCREEN.to_string());
            return;
        }
        self.entries.push(app_id.to_string());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
    }

    /// Remove the top entry unless it is the last one.
    pub fn pop(&mut self) -> Option<String> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Pop, then return the view to display.
    pub fn back(&mut self) -> String {
        self.pop();
        match self.entries.last() {
            Some(top) if self.entries.len() > 1 => top.clone(),
            _ => HOME_SCREEN.to_string(),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn top(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Recents list: most recent first, each app once, without home.
    pub fn recents(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for id in self.entries.iter().rev() {
            if id == HOME_SCREEN || is_pseudo_view(id) || seen.contains(&id.as_str()) {
                continue;
            }
            seen.push(id);
        }
        seen
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
