use tauri::{AppHandle, Emitter, Manager, PhysicalPosition, PhysicalSize, State, Webview, WebviewBuilder, WebviewUrl, Window, WindowEvent};
use tauri::menu::{MenuBuilder, SubmenuBuilder, PredefinedMenuItem, MenuItemBuilder};
use tauri::webview::PageLoadEvent;
use url::Url;
use serde::Serialize;

use tabshell_browser_lib::modules::tabs::CloseOutcome;
use tabshell_browser_lib::registers::{RegisterEntry, RegisterKind};
use tabshell_browser_lib::session::{window_title, BrowserSession, APP_NAME};
use tabshell_browser_lib::settings::{SearchEngine, Settings};
use tabshell_browser_lib::state::{AppState, TabsPayload};
use tabshell_browser_lib::surface::{DeferredSurface, RenderingSurface};

// Tab strip row plus the navigation toolbar.
const TOOLBAR_HEIGHT_LOGICAL: f64 = 56.0 + 28.0;

/// A tab's child webview seen through the session's surface trait.
struct ContentView(Webview);

impl RenderingSurface for ContentView {
    fn navigate(&self, url: &str) {
        match Url::parse(url) {
            Ok(u) => {
                if let Err(e) = self.0.navigate(u) {
                    log::warn!("[Navigation] Webview refused {}: {}", url, e);
                }
            }
            Err(e) => log::warn!("[Navigation] Cannot load {:?}: {}", url, e),
        }
    }

    fn back(&self) {
        let _ = self.0.eval("window.history.back()");
    }

    fn forward(&self) {
        let _ = self.0.eval("window.history.forward()");
    }

    fn reload(&self) {
        let _ = self.0.eval("window.location.reload()");
    }

    fn stop(&self) {
        let _ = self.0.eval("window.stop()");
    }

    fn current_url(&self) -> Option<String> {
        self.0.url().ok().map(|u| u.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineOption {
    engine: SearchEngine,
    label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsPayload {
    engines: Vec<EngineOption>,
    selected: SearchEngine,
}

fn active_view(app: &AppHandle, state: &AppState) -> Result<Option<ContentView>, String> {
    let label = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.tabs.active().map(|t| t.webview_label.clone())
    };
    Ok(label.and_then(|l| app.get_webview(&l)).map(ContentView))
}

/// Runs a session handler against a command queue under the lock, then
/// plays the queued commands onto the active webview.
fn drive_active<F>(app: &AppHandle, f: F) -> Result<(), String>
where
    F: FnOnce(&mut BrowserSession, &DeferredSurface),
{
    let state = app.state::<AppState>();
    let view = active_view(app, &state)?;
    let deferred = DeferredSurface::new(view.as_ref().and_then(|v| v.current_url()));
    {
        let mut session = state.session.lock().map_err(|e| e.to_string())?;
        f(&mut *session, &deferred);
    }
    if let Some(view) = view {
        deferred.replay(&view);
    }
    Ok(())
}

fn content_bounds(window: &Window) -> tauri::Result<(PhysicalPosition<i32>, PhysicalSize<u32>)> {
    let physical_size = window.inner_size()?;
    let scale_factor = window.scale_factor()?;
    let toolbar_height_physical = (TOOLBAR_HEIGHT_LOGICAL * scale_factor) as u32;
    let content_height = physical_size.height.saturating_sub(toolbar_height_physical).max(100);
    Ok((
        PhysicalPosition::new(0, toolbar_height_physical as i32),
        PhysicalSize::new(physical_size.width, content_height),
    ))
}

fn emit_tabs(app: &AppHandle) {
    let state = app.state::<AppState>();
    let payload: Option<TabsPayload> = state.session.lock().ok().map(|s| s.tabs.payload());
    if let Some(payload) = payload {
        let _ = app.emit("update-tabs", payload);
    }
}

fn emit_registers_changed(app: &AppHandle, kind: RegisterKind) {
    let _ = app.emit("registers-changed", serde_json::json!({ "kind": kind }));
}

/// Shows the active tab's webview, hides the rest, and syncs the chrome.
fn show_only_active(app: &AppHandle) {
    let state = app.state::<AppState>();
    let (labels, active) = match state.session.lock() {
        Ok(session) => (
            session.tabs.tabs().iter().map(|t| t.webview_label.clone()).collect::<Vec<_>>(),
            session.tabs.active().cloned(),
        ),
        Err(_) => return,
    };
    let Some(active) = active else { return };

    for label in labels {
        if let Some(wv) = app.get_webview(&label) {
            let _ = if label == active.webview_label { wv.show() } else { wv.hide() };
        }
    }

    let _ = app.emit("url-changed", &active.url);
    if let Some(main_win) = app.get_window("main") {
        let _ = main_win.set_title(&window_title(&active.url));
    }
    emit_tabs(app);
}

fn on_url_changed(app: &AppHandle, label: &str, url: &str) {
    let state = app.state::<AppState>();
    let update = match state.session.lock() {
        Ok(mut session) => {
            let text = session.on_url_changed(label, url);
            let is_active = session.tabs.active().is_some_and(|t| t.webview_label == label);
            is_active.then_some(text)
        }
        Err(_) => return,
    };
    if let Some(text) = update {
        let _ = app.emit("url-changed", text);
    }
    emit_tabs(app);
}

fn on_load_finished(app: &AppHandle, label: &str, url: &str) {
    let state = app.state::<AppState>();
    let update = match state.session.lock() {
        Ok(mut session) => {
            let update = session.on_load_finished(label, url);
            let is_active = session.tabs.active().is_some_and(|t| t.webview_label == label);
            is_active.then_some(update)
        }
        Err(_) => return,
    };
    if let Some(update) = update {
        if let Some(main_win) = app.get_window("main") {
            let _ = main_win.set_title(&update.window_title);
        }
        // Redirects may never pass through on_navigation
        let _ = app.emit("url-changed", &update.address_text);
    }
    emit_tabs(app);
    emit_registers_changed(app, RegisterKind::History);
}

fn open_tab(app: &AppHandle) -> Result<(), String> {
    let window = app.get_window("main").ok_or("main window is gone")?;
    let state = app.state::<AppState>();
    let tab = state.session.lock().map_err(|e| e.to_string())?.new_tab();
    let start_url = Url::parse(&tab.url).map_err(|e| e.to_string())?;

    let nav_app = app.clone();
    let nav_label = tab.webview_label.clone();
    let webview_builder = WebviewBuilder::new(&tab.webview_label, WebviewUrl::External(start_url))
        .on_navigation(move |url| {
            on_url_changed(&nav_app, &nav_label, url.as_str());
            true
        })
        .on_page_load(|webview: Webview, payload| {
            if let PageLoadEvent::Finished = payload.event() {
                on_load_finished(webview.app_handle(), webview.label(), payload.url().as_str());
            }
        });

    let (position, size) = content_bounds(&window).map_err(|e| e.to_string())?;
    window
        .add_child(webview_builder, position, size)
        .map_err(|e| e.to_string())?;

    log::info!("[Tabs] Opened {} ({})", tab.id, tab.webview_label);
    show_only_active(app);
    // New tabs start with an empty address bar
    let _ = app.emit("url-changed", "");
    Ok(())
}

fn close_tab_at(app: &AppHandle, index: usize) -> Result<(), String> {
    let state = app.state::<AppState>();
    let outcome = state.session.lock().map_err(|e| e.to_string())?.close_tab(index);
    match outcome {
        CloseOutcome::Closed(tab) => {
            if let Some(wv) = app.get_webview(&tab.webview_label) {
                wv.close().map_err(|e| e.to_string())?;
            }
            show_only_active(app);
        }
        CloseOutcome::LastTab => {
            if let Some(main_win) = app.get_window("main") {
                main_win.close().map_err(|e| e.to_string())?;
            }
        }
        CloseOutcome::OutOfRange => {
            log::debug!("[Tabs] Ignoring close of missing tab {}", index);
        }
    }
    Ok(())
}

fn add_current_bookmark(app: &AppHandle) -> Result<(), String> {
    let state = app.state::<AppState>();
    let Some(url) = active_view(app, &state)?.and_then(|v| v.current_url()) else {
        return Ok(());
    };
    let added = state.session.lock().map_err(|e| e.to_string())?.add_bookmark(&url);
    if added {
        emit_registers_changed(app, RegisterKind::Bookmarks);
        show_register_window(app, RegisterKind::Bookmarks);
    }
    Ok(())
}

fn with_active_view(app: &AppHandle, f: impl FnOnce(&ContentView)) -> Result<(), String> {
    let state = app.state::<AppState>();
    if let Some(view) = active_view(app, &state)? {
        f(&view);
    }
    Ok(())
}

// Show history or bookmarks list window
fn show_register_window(app: &AppHandle, kind: RegisterKind) {
    if let Some(win) = app.get_window(kind.label()) {
        let _ = win.set_focus();
        return;
    }

    let init_script = format!("window.__REGISTER_KIND__ = '{}';", kind.label());
    let register_window = tauri::WebviewWindowBuilder::new(
        app,
        kind.label(),
        WebviewUrl::App("register.html".into())
    )
    .title(kind.title())
    .inner_size(360.0, 440.0)
    .resizable(true)
    .minimizable(false)
    .maximizable(false)
    .center()
    .focused(true)
    .initialization_script(&init_script)
    .build();

    if let Err(e) = register_window {
        log::error!("Failed to create {} window: {:?}", kind.label(), e);
    }
}

// Show settings window
fn show_settings_window(app: &AppHandle) {
    if let Some(win) = app.get_window("settings") {
        let _ = win.set_focus();
        return;
    }

    let settings_window = tauri::WebviewWindowBuilder::new(
        app,
        "settings",
        WebviewUrl::App("settings.html".into())
    )
    .title("Settings")
    .inner_size(320.0, 340.0)
    .resizable(false)
    .minimizable(false)
    .maximizable(false)
    .center()
    .focused(true)
    .build();

    if let Err(e) = settings_window {
        log::error!("Failed to create settings window: {:?}", e);
    }
}

#[tauri::command]
fn navigate(app: AppHandle, url: String) -> Result<(), String> {
    drive_active(&app, |session, surface| {
        session.navigate_to_address(&url, surface);
    })
}

#[tauri::command]
fn go_back(app: AppHandle) -> Result<(), String> {
    with_active_view(&app, |view| view.back())
}

#[tauri::command]
fn go_forward(app: AppHandle) -> Result<(), String> {
    with_active_view(&app, |view| view.forward())
}

#[tauri::command]
fn reload(app: AppHandle) -> Result<(), String> {
    with_active_view(&app, |view| view.reload())
}

#[tauri::command]
fn stop(app: AppHandle) -> Result<(), String> {
    with_active_view(&app, |view| view.stop())
}

#[tauri::command]
fn go_home(app: AppHandle) -> Result<(), String> {
    drive_active(&app, |session, surface| session.go_home(surface))
}

#[tauri::command]
fn open_youtube(app: AppHandle) -> Result<(), String> {
    drive_active(&app, |session, surface| session.open_youtube(surface))
}

#[tauri::command]
async fn new_tab(app: AppHandle) -> Result<(), String> {
    open_tab(&app)
}

#[tauri::command]
fn close_tab(app: AppHandle, index: usize) -> Result<(), String> {
    close_tab_at(&app, index)
}

#[tauri::command]
fn select_tab(app: AppHandle, state: State<AppState>, index: usize) -> Result<(), String> {
    let selected = state.session.lock().map_err(|e| e.to_string())?.tabs.select(index).is_some();
    if selected {
        show_only_active(&app);
    }
    Ok(())
}

#[tauri::command]
fn get_tabs(state: State<AppState>) -> Result<TabsPayload, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.tabs.payload())
}

#[tauri::command]
async fn add_bookmark(app: AppHandle) -> Result<(), String> {
    add_current_bookmark(&app)
}

#[tauri::command]
fn list_register(state: State<AppState>, kind: RegisterKind) -> Result<Vec<RegisterEntry>, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.register(kind).entries().to_vec())
}

#[tauri::command]
fn open_register_entry(app: AppHandle, kind: RegisterKind, index: usize) -> Result<(), String> {
    drive_active(&app, |session, surface| {
        session.open_register_entry(kind, index, surface);
    })
}

#[tauri::command]
fn clear_register(app: AppHandle, state: State<AppState>, kind: RegisterKind) -> Result<(), String> {
    state.session.lock().map_err(|e| e.to_string())?.clear_register(kind);
    emit_registers_changed(&app, kind);
    Ok(())
}

#[tauri::command]
async fn show_register(app: AppHandle, kind: RegisterKind) {
    show_register_window(&app, kind);
}

#[tauri::command]
fn get_settings(state: State<AppState>) -> Result<SettingsPayload, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(SettingsPayload {
        engines: SearchEngine::ALL
            .into_iter()
            .map(|engine| EngineOption { engine, label: engine.label() })
            .collect(),
        selected: session.settings.search_engine,
    })
}

#[tauri::command]
fn save_settings(state: State<AppState>, engine: SearchEngine) -> Result<(), String> {
    let settings = {
        let mut session = state.session.lock().map_err(|e| e.to_string())?;
        session.set_search_engine(engine);
        session.settings.clone()
    };
    settings.save(&state.settings_path).map_err(|e| e.to_string())
}

#[tauri::command]
async fn show_settings(app: AppHandle) {
    show_settings_window(&app);
}

#[tauri::command]
fn show_page_menu(app: AppHandle) -> Result<(), String> {
    let window = app.get_window("main").ok_or("main window is gone")?;
    let menu = MenuBuilder::new(&app)
        .item(&MenuItemBuilder::with_id("add_bookmark", "Add to Bookmark").build(&app).map_err(|e| e.to_string())?)
        .build()
        .map_err(|e| e.to_string())?;
    window.popup_menu(&menu).map_err(|e| e.to_string())
}

fn main() {
    tauri::Builder::default()
        .setup(move |app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // Settings are read back at startup; everything else starts empty.
            let settings_path = Settings::get_path(&app.path().app_data_dir()?);
            let settings = Settings::load(&settings_path);
            log::info!("[Settings] Search engine: {}", settings.search_engine.label());
            app.manage(AppState::new(BrowserSession::new(settings), settings_path));

            let main_window: Window = app.get_window("main").ok_or("main window missing")?;
            let handle = app.handle().clone();

            // --- Build Native Menu ---
            let app_menu = SubmenuBuilder::new(app, APP_NAME)
                .item(&PredefinedMenuItem::about(app, Some("About Tabshell"), None)?)
                .separator()
                .item(&MenuItemBuilder::with_id("settings", "Settings").accelerator("CmdOrCtrl+,").build(app)?)
                .separator()
                .item(&PredefinedMenuItem::quit(app, Some("Quit Tabshell"))?)
                .build()?;

            let file_menu = SubmenuBuilder::new(app, "File")
                .item(&MenuItemBuilder::with_id("new_tab", "New Tab").accelerator("CmdOrCtrl+T").build(app)?)
                .item(&MenuItemBuilder::with_id("close_tab", "Close Tab").accelerator("CmdOrCtrl+W").build(app)?)
                .build()?;

            let edit_menu = SubmenuBuilder::new(app, "Edit")
                .item(&PredefinedMenuItem::undo(app, Some("Undo"))?)
                .item(&PredefinedMenuItem::redo(app, Some("Redo"))?)
                .separator()
                .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
                .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
                .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
                .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
                .build()?;

            let view_menu = SubmenuBuilder::new(app, "View")
                .item(&MenuItemBuilder::with_id("focus_location", "Open Location").accelerator("CmdOrCtrl+L").build(app)?)
                .item(&MenuItemBuilder::with_id("reload", "Reload Page").accelerator("CmdOrCtrl+R").build(app)?)
                .item(&MenuItemBuilder::with_id("stop", "Stop Loading").build(app)?)
                .build()?;

            let history_menu = SubmenuBuilder::new(app, "History")
                .item(&MenuItemBuilder::with_id("go_back", "Back").accelerator("CmdOrCtrl+[").build(app)?)
                .item(&MenuItemBuilder::with_id("go_forward", "Forward").accelerator("CmdOrCtrl+]").build(app)?)
                .item(&MenuItemBuilder::with_id("go_home", "Home").accelerator("CmdOrCtrl+Shift+H").build(app)?)
                .separator()
                .item(&MenuItemBuilder::with_id("show_history", "Show History").accelerator("CmdOrCtrl+Y").build(app)?)
                .build()?;

            let bookmarks_menu = SubmenuBuilder::new(app, "Bookmarks")
                .item(&MenuItemBuilder::with_id("add_bookmark", "Add to Bookmarks").accelerator("CmdOrCtrl+D").build(app)?)
                .item(&MenuItemBuilder::with_id("show_bookmarks", "Show Bookmarks").accelerator("CmdOrCtrl+Shift+B").build(app)?)
                .build()?;

            let menu = MenuBuilder::new(app)
                .items(&[&app_menu, &file_menu, &edit_menu, &view_menu, &history_menu, &bookmarks_menu])
                .build()?;

            app.set_menu(menu)?;

            // Handle menu events (the page context menu routes here too)
            let handle_for_menu = handle.clone();

            app.on_menu_event(move |_app_handle, event| {
                let app = &handle_for_menu;
                let result = match event.id().0.as_str() {
                    "settings" => {
                        show_settings_window(app);
                        Ok(())
                    }
                    "new_tab" => open_tab(app),
                    "close_tab" => {
                        let index = app
                            .state::<AppState>()
                            .session
                            .lock()
                            .ok()
                            .and_then(|s| s.tabs.active_index());
                        match index {
                            Some(i) => close_tab_at(app, i),
                            None => Ok(()),
                        }
                    }
                    "focus_location" => {
                        if let Some(main_win) = app.get_window("main") {
                            let _ = main_win.set_focus();
                            let _ = main_win.emit("focus-url-bar", ());
                        }
                        Ok(())
                    }
                    "reload" => with_active_view(app, |view| view.reload()),
                    "stop" => with_active_view(app, |view| view.stop()),
                    "go_back" => with_active_view(app, |view| view.back()),
                    "go_forward" => with_active_view(app, |view| view.forward()),
                    "go_home" => drive_active(app, |session, surface| session.go_home(surface)),
                    "show_history" => {
                        show_register_window(app, RegisterKind::History);
                        Ok(())
                    }
                    "add_bookmark" => add_current_bookmark(app),
                    "show_bookmarks" => {
                        show_register_window(app, RegisterKind::Bookmarks);
                        Ok(())
                    }
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    log::warn!("[Menu] {} failed: {}", event.id().0, e);
                }
            });

            // --- First tab ---
            open_tab(&handle)?;

            // Handle Window Resizing and closing
            let main_window_clone = main_window.clone();
            main_window.on_window_event(move |event| match event {
                WindowEvent::Resized(new_physical_size) => {
                    let scale = main_window_clone.scale_factor().unwrap_or(1.0);
                    let toolbar_physical = (TOOLBAR_HEIGHT_LOGICAL * scale) as u32;
                    let content_h = new_physical_size.height.saturating_sub(toolbar_physical).max(100);

                    let labels: Vec<String> = handle
                        .state::<AppState>()
                        .session
                        .lock()
                        .map(|s| s.tabs.tabs().iter().map(|t| t.webview_label.clone()).collect())
                        .unwrap_or_default();

                    for label in labels {
                        if let Some(wv) = handle.get_webview(&label) {
                            let _ = wv.set_bounds(tauri::Rect {
                                position: tauri::Position::Physical(PhysicalPosition::new(0, toolbar_physical as i32)),
                                size: tauri::Size::Physical(PhysicalSize::new(new_physical_size.width, content_h)),
                            });
                        }
                    }
                }
                WindowEvent::Destroyed => {
                    if let Ok(mut session) = handle.state::<AppState>().session.lock() {
                        session.on_window_closed();
                    }
                    log::info!("[Window] Main window closed, history cleared");
                    handle.exit(0);
                }
                _ => {}
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            navigate,
            go_back,
            go_forward,
            reload,
            stop,
            go_home,
            open_youtube,
            new_tab,
            close_tab,
            select_tab,
            get_tabs,
            add_bookmark,
            list_register,
            open_register_entry,
            clear_register,
            show_register,
            get_settings,
            save_settings,
            show_settings,
            show_page_menu
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
