use crate::adapter::{RowAdapter, RowSurface};
use crate::loader::LoadMsg;

pub struct App {
    /// Rows for the most recently started load that has completed.
    pub adapter: RowAdapter,
    /// Selected row, if any.
    pub selected: Option<usize>,
    /// Index of the first row in the visible window.
    pub offset: usize,
    /// Generation of the newest load started; older results are ignored.
    pub latest_generation: u64,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Whether the user has asked for a fresh load.
    pub reload_requested: bool,
    /// A started load has not delivered yet.
    pub loading: bool,
    /// Last load status message.
    pub status: String,
    /// Surfaces from the previous frame, rebound on the next one.
    row_pool: Vec<RowSurface>,
}

impl App {
    pub fn new() -> Self {
        Self {
            adapter: RowAdapter::default(),
            selected: None,
            offset: 0,
            latest_generation: 0,
            quit: false,
            reload_requested: false,
            loading: false,
            status: "Starting…".into(),
            row_pool: Vec::new(),
        }
    }

    /// Note that a load with `generation` has been started.
    pub fn load_started(&mut self, generation: u64) {
        self.latest_generation = self.latest_generation.max(generation);
        self.loading = true;
        self.status = "Loading…".into();
    }

    /// Ask for a fresh load unless one is still running, so holding `r`
    /// cannot pile up fetch threads.
    pub fn request_reload(&mut self) {
        if self.loading {
            self.status = "Load already in progress".into();
        } else {
            self.reload_requested = true;
        }
    }

    /// Apply a finished load.  Returns `false` if it was superseded.
    pub fn apply_load(&mut self, msg: LoadMsg) -> bool {
        if msg.generation != self.latest_generation {
            return false;
        }

        self.loading = false;
        let count = msg.records.len();
        self.adapter.replace(msg.records);
        self.offset = 0;
        self.selected = (count > 0).then_some(0);
        self.status = if count == 0 {
            "No earthquakes loaded".into()
        } else {
            format!("Loaded {count} earthquakes")
        };
        true
    }

    pub fn row_count(&self) -> usize {
        self.adapter.row_count()
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn select_previous(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn select_first(&mut self) {
        if self.row_count() > 0 {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.selected = Some(len - 1);
        }
    }

    // -- lazy row materialisation --------------------------------------------

    /// Bind the rows that fit in a window of `height` lines.
    ///
    /// Scrolls the window so the selection stays visible, then asks the
    /// adapter only for those rows, handing it last frame's surfaces to
    /// rebind.  The returned slice is valid until the next call.
    pub fn visible_rows(&mut self, height: usize) -> &[RowSurface] {
        let len = self.row_count();
        if let Some(selected) = self.selected {
            if selected < self.offset {
                self.offset = selected;
            } else if height > 0 && selected >= self.offset + height {
                self.offset = selected + 1 - height;
            }
        }
        self.offset = self.offset.min(len.saturating_sub(1));

        let end = (self.offset + height).min(len);
        let mut recycled = std::mem::take(&mut self.row_pool).into_iter();
        let mut rows = Vec::with_capacity(end - self.offset);
        for index in self.offset..end {
            // `index < len` holds by construction of `end`.
            if let Ok(row) = self.adapter.row_at(index, recycled.next()) {
                rows.push(row);
            }
        }
        self.row_pool = rows;
        &self.row_pool
    }
}
