use crate::core::input::{InputError, InputHandler, InputProvider};
use crate::core::models::{ListState, Photo};
use crate::core::navigation::Route;
use crate::core::render;
use crate::core::source::PhotoSource;
use crate::core::state::ImageListState;
use crate::core::storage::PhotoStore;
use crate::core::sync::JobReport;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Terminal front end over the shared [`ImageListState`].
pub struct App<S: PhotoStore, P: PhotoSource, I: InputProvider> {
    rt: Handle,
    state: Arc<ImageListState<S, P>>,
    sync: watch::Receiver<JobReport>,
    route: watch::Receiver<Route>,
    input: InputHandler<I>,
}

impl<S: PhotoStore, P: PhotoSource, I: InputProvider> App<S, P, I> {
    pub fn new(
        rt: Handle,
        state: Arc<ImageListState<S, P>>,
        sync: watch::Receiver<JobReport>,
        input_provider: I,
    ) -> Self {
        let route = state.subscribe_route();
        Self {
            rt,
            state,
            sync,
            route,
            input: InputHandler::new(input_provider),
        }
    }

    pub fn run(&mut self) {
        println!("== MYPICS ==");

        loop {
            println!("\n[1] Available  [2] Saved  [3] Save  [4] Delete  [5] Detail  [6] Reload  [7] Sync status  [8] Exit");
            let choice = match self.input.get_string_trimmed("Selection: ") {
                Ok(c) => c,
                // stdin closed
                Err(InputError::Io(_)) => break,
                Err(_) => continue,
            };

            match choice.as_str() {
                "1" => self.print_list(&self.state.available(), "No available images."),
                "2" => self.print_list(&self.state.saved(), "No saved images available."),
                "3" => self.save_flow(),
                "4" => self.delete_flow(),
                "5" => self.detail_flow(),
                "6" => {
                    println!("Reloading...");
                    let state = self.rt.block_on(self.state.load_available());
                    self.print_list(&state, "No available images.");
                }
                "7" => self.print_sync_status(),
                "8" => {
                    println!("Goodbye!");
                    break;
                }
                _ => println!("Invalid selection, please try again."),
            }
        }
    }

    fn print_list(&self, state: &ListState<Photo>, empty: &str) {
        for line in render::list_lines(state, empty) {
            println!("{line}");
        }
    }

    fn print_sync_status(&self) {
        match &*self.sync.borrow() {
            JobReport::Pending => println!("Background sync has not started."),
            JobReport::Running => println!("Background sync is running..."),
            JobReport::Succeeded { count } => println!("Background sync mirrored {count} photos."),
            JobReport::Failed { reason } => println!("Background sync failed: {reason}"),
        }
    }

    /// Lists `state` and lets the user pick one of its photos.
    fn select_photo(&mut self, state: ListState<Photo>, empty: &str, prompt: &str) -> Option<Photo> {
        let items = match state.items() {
            Some([]) => {
                println!("{empty}");
                return None;
            }
            Some(items) => items,
            None => {
                self.print_list(&state, empty);
                return None;
            }
        };
        self.print_list(&state, empty);
        match self.input.pick_index(prompt, items.len()) {
            Ok(idx) => Some(items[idx].clone()),
            Err(_) => {
                println!("Invalid selection.");
                None
            }
        }
    }

    fn save_flow(&mut self) {
        let Some(photo) = self.select_photo(self.state.available(), "No available images.", "Save #: ")
        else {
            return;
        };
        let title = photo.title.clone();
        match self.rt.block_on(self.state.save(photo)) {
            Ok(()) => println!("Saved: {title}"),
            Err(e) => eprintln!("Saved in this session only: {e}"),
        }
    }

    fn delete_flow(&mut self) {
        let Some(photo) = self.select_photo(self.state.saved(), "No saved images available.", "Delete #: ")
        else {
            return;
        };
        match self.rt.block_on(self.state.delete(&photo)) {
            Ok(()) => println!("Deleted: {}", photo.title),
            Err(e) => eprintln!("Removed in this session only: {e}"),
        }
    }

    fn detail_flow(&mut self) {
        let Some(photo) = self.select_photo(self.state.available(), "No available images.", "View #: ")
        else {
            return;
        };
        self.state.view_image(&photo);
        self.show_route();
    }

    /// Renders whatever screen the state last navigated to.
    fn show_route(&mut self) {
        let route = *self.route.borrow_and_update();
        match route {
            Route::Detail(id) => {
                for line in render::detail_lines(self.state.get_by_id(id).as_ref()) {
                    println!("{line}");
                }
            }
            Route::List => self.print_list(&self.state.available(), "No available images."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::scripted::ScriptedInput;
    use crate::core::models::sample_photo;
    use crate::core::source::fixture::FixtureSource;
    use crate::core::storage::memory::MemoryStore;
    use crate::core::sync::SyncJob;
    use tokio::runtime::Runtime;

    fn setup(
        rt: &Runtime,
        script: &[&str],
    ) -> (
        App<MemoryStore, FixtureSource, ScriptedInput>,
        Arc<ImageListState<MemoryStore, FixtureSource>>,
        Arc<MemoryStore>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(FixtureSource::new((1..=5).map(sample_photo).collect()));
        let state = Arc::new(ImageListState::new(Arc::clone(&store), Arc::clone(&source), 3));
        rt.block_on(state.initial_load());
        let job = SyncJob::new(Arc::clone(&store), source);
        let app = App::new(
            rt.handle().clone(),
            Arc::clone(&state),
            job.subscribe(),
            ScriptedInput::new(script),
        );
        (app, state, store)
    }

    #[test]
    fn test_save_then_delete_through_menu() {
        let rt = Runtime::new().unwrap();
        let (mut app, state, store) = setup(&rt, &["3", "2", "3", "3", "4", "1", "8"]);

        app.run();

        let saved: Vec<_> = state.saved().items().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(saved, vec![3]);
        assert_eq!(store.saved_ids(), vec![3]);
    }

    #[test]
    fn test_detail_navigates_to_selected_photo() {
        let rt = Runtime::new().unwrap();
        let (mut app, state, _) = setup(&rt, &["5", "2"]);
        let route = state.subscribe_route();

        app.run();

        assert_eq!(*route.borrow(), Route::Detail(2));
        assert!(!app.route.has_changed().unwrap());
    }

    #[test]
    fn test_out_of_range_selection_changes_nothing() {
        let rt = Runtime::new().unwrap();
        let (mut app, state, store) = setup(&rt, &["3", "9", "8"]);

        app.run();

        assert_eq!(state.saved(), ListState::loaded(vec![]));
        assert!(store.saved_ids().is_empty());
    }
}
