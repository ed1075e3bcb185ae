use crate::config;
use crate::events::AppEvent;
use crate::geometry::Point;
use crate::gui::chart::{self, AnimationClock, ChartState, InputAction};
use crate::gui::export;
use crate::gui::theme::{self, ThemeColors};
use crate::session;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<ChartState>>,
    pub chart_path: Option<PathBuf>,
    pub session_path: Option<PathBuf>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    clock: Rc<AnimationClock>,
    anim_running: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Resize(i32, i32),
    AddProfile,
    CycleProfile,
    ToggleVisibility,
    DeleteProfile,
    SaveSession,
    LoadSession,
    ExportImage,
    ChartReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ChartReload => AppMsg::ChartReload,
        }
    }
}

pub struct AppInit {
    pub state: ChartState,
    pub chart_path: Option<PathBuf>,
    pub session_path: Option<PathBuf>,
    pub rx: async_channel::Receiver<AppEvent>,
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Motivrad"),
            set_default_width: 1280,
            set_default_height: 960,
            add_css_class: "motivrad-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    let msg = match key {
                        gtk::gdk::Key::n => Some(AppMsg::AddProfile),
                        gtk::gdk::Key::Tab => Some(AppMsg::CycleProfile),
                        gtk::gdk::Key::v => Some(AppMsg::ToggleVisibility),
                        gtk::gdk::Key::Delete => Some(AppMsg::DeleteProfile),
                        gtk::gdk::Key::s => Some(AppMsg::SaveSession),
                        gtk::gdk::Key::o => Some(AppMsg::LoadSession),
                        gtk::gdk::Key::e => Some(AppMsg::ExportImage),
                        _ => None,
                    };
                    match msg {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "motivrad-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 1,
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::PointerDown(Point::new(x, y)));
                    },
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(AppMsg::PointerUp);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        theme::load_css();

        let state = Rc::new(RefCell::new(init.state));

        let model = AppModel {
            state: state.clone(),
            chart_path: init.chart_path,
            session_path: init.session_path,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            clock: Rc::new(AnimationClock::new()),
            anim_running: Rc::new(Cell::new(false)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = chart::draw(cr, &state_draw.borrow(), &colors) {
                    log::error!("drawing error: {e}");
                }
            });

        restore_session(&model);

        {
            let state = model.state.clone();
            let path = model.session_path.clone();
            root.connect_close_request(move |_| {
                save_session(&state.borrow(), path.as_deref());
                glib::Propagation::Proceed
            });
        }

        let sender_clone = sender.clone();
        let rx = init.rx;
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerDown(p) => {
                let action = self
                    .state
                    .borrow_mut()
                    .pointer_down(p, 0.0, self.clock.now_ms());
                self.apply(action);
            }
            AppMsg::PointerMove(p) => {
                let action = self.state.borrow_mut().pointer_move(p, 0.0);
                self.apply(action);
            }
            AppMsg::PointerUp => {
                let action = self.state.borrow_mut().pointer_up();
                self.apply(action);
            }
            AppMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .resize(width as f64, height as f64);
                self.drawing_area.queue_draw();
            }
            AppMsg::AddProfile => {
                let mut state = self.state.borrow_mut();
                let count = state.category_count();
                let id = state.profiles.add(count);
                log::info!("created profile {id}");
                drop(state);
                self.drawing_area.queue_draw();
            }
            AppMsg::CycleProfile => {
                self.state.borrow_mut().profiles.cycle_current();
                self.drawing_area.queue_draw();
            }
            AppMsg::ToggleVisibility => {
                if let Some(profile) = self.state.borrow_mut().profiles.current_mut() {
                    profile.visible = !profile.visible;
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::DeleteProfile => {
                let mut state = self.state.borrow_mut();
                if let Some(id) = state.profiles.current_id() {
                    state.profiles.remove(id);
                    log::info!("deleted profile {id}");
                }
                drop(state);
                self.drawing_area.queue_draw();
            }
            AppMsg::SaveSession => {
                save_session(&self.state.borrow(), self.session_path.as_deref());
            }
            AppMsg::LoadSession => {
                self.load_session();
                self.drawing_area.queue_draw();
            }
            AppMsg::ExportImage => {
                self.export_image();
                self.drawing_area.queue_draw();
            }
            AppMsg::ChartReload => {
                match config::load_config(self.chart_path.as_deref()) {
                    Ok(new_config) => {
                        self.state.borrow_mut().reload(&new_config);
                        self.drawing_area.queue_draw();
                        log::info!("chart definition reloaded");
                    }
                    Err(e) => {
                        // the previous chart definition stays in effect
                        log::error!("failed to reload chart definition: {e}");
                        self.notify_error(&format!("Fehler beim Laden der Kategorien: {e}"));
                    }
                }
            }
        }
    }
}

impl AppModel {
    fn apply(&self, action: InputAction) {
        if action.should_animate {
            self.start_animation_loop();
        }
        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
    }

    /// Registers the shared frame scheduler. It runs once per frame while
    /// any selector animates and unregisters itself afterwards, so nothing
    /// polls while everything is settled.
    fn start_animation_loop(&self) {
        if self.anim_running.get() {
            return;
        }
        self.anim_running.set(true);

        let state = self.state.clone();
        let clock = self.clock.clone();
        let running = self.anim_running.clone();
        let area = self.drawing_area.clone();

        self.drawing_area.add_tick_callback(move |_, _| {
            let any = state.borrow_mut().tick(clock.now_ms());
            area.queue_draw();
            if any {
                glib::ControlFlow::Continue
            } else {
                running.set(false);
                glib::ControlFlow::Break
            }
        });
    }

    fn load_session(&self) {
        let path = match resolve_session_path(self.session_path.as_deref()) {
            Some(p) => p,
            None => return,
        };
        match session::load_from_file(&path) {
            Ok(loaded) => {
                self.state.borrow_mut().apply_session(&loaded);
                log::info!("session loaded from {}", path.display());
            }
            Err(e) => {
                // the load aborts without touching the current profiles
                log::error!("failed to load session: {e}");
                self.notify_error(&format!("Fehler beim Laden der Datei: {e}"));
            }
        }
    }

    fn notify_error(&self, message: &str) {
        let dialog = gtk::AlertDialog::builder().message(message).build();
        dialog.show(Some(&self.root));
    }

    fn export_image(&self) {
        let path = match export_path() {
            Some(p) => p,
            None => return,
        };
        let mut state = self.state.borrow_mut();
        let colors = ThemeColors::fallback();
        match export::export_png(&mut state, &colors, &path) {
            Ok(()) => log::info!("chart exported to {}", path.display()),
            Err(e) => log::error!("failed to export chart: {e}"),
        }
    }
}

fn resolve_session_path(override_path: Option<&std::path::Path>) -> Option<PathBuf> {
    match override_path {
        Some(p) => Some(p.to_path_buf()),
        None => match session::default_session_path() {
            Ok(p) => Some(p),
            Err(e) => {
                log::error!("no session path available: {e}");
                None
            }
        },
    }
}

fn export_path() -> Option<PathBuf> {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()?
        .as_secs();
    let base = resolve_session_path(None)?;
    Some(base.with_file_name(format!("motivrad-{stamp}.png")))
}

fn restore_session(model: &AppModel) {
    let Some(path) = resolve_session_path(model.session_path.as_deref()) else {
        return;
    };
    if !path.exists() {
        return;
    }
    match session::load_from_file(&path) {
        Ok(loaded) => {
            model.state.borrow_mut().apply_session(&loaded);
            log::info!("restored session from {}", path.display());
        }
        Err(e) => log::warn!("could not restore previous session: {e}"),
    }
}

fn save_session(state: &ChartState, override_path: Option<&std::path::Path>) {
    let Some(path) = resolve_session_path(override_path) else {
        return;
    };
    match session::save_to_file(&path, &state.to_session()) {
        Ok(()) => log::info!("session saved to {}", path.display()),
        Err(e) => log::error!("failed to save session: {e}"),
    }
}
