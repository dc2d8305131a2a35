use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use tauri::{Emitter, Manager, State};
use tauri_plugin_dialog::DialogExt;

use crate::core::{
    config::{ConfigManager, Settings},
    filter::AlertFilter,
    geocode::{GeocodeClient, GeocodeError, GeocodeHit},
    map_sync::{MapSurface, MapSyncEngine, Marker},
    model::{NewAlert, Severity},
    persist::AlertStorage,
    photo, report,
    store::AlertStore,
    view::{self, AlertListEntry, Stats},
};

struct AppState {
    store: Mutex<AlertStore>,
    filter: Mutex<AlertFilter>,
    map: Mutex<MapSyncEngine>,
    storage: AlertStorage,
    settings: Mutex<Settings>,
    config_manager: ConfigManager,
    geocoder: GeocodeClient,
}

/// Production map surface: forwards marker operations to the Leaflet map in
/// the webview, one event per operation.
struct WebviewMap<'a> {
    app: &'a tauri::AppHandle,
}

impl MapSurface for WebviewMap<'_> {
    fn remove_all_markers(&mut self) {
        let _ = self.app.emit("map-remove-all", ());
    }

    fn place_marker(&mut self, marker: &Marker) {
        let _ = self.app.emit("map-add-marker", marker);
    }
}

/// Everything the webview needs to redraw map, list and counters at once.
#[derive(serde::Serialize)]
struct RefreshPayload {
    markers: Vec<Marker>,
    list: Vec<AlertListEntry>,
    #[serde(rename = "listPlaceholder", skip_serializing_if = "Option::is_none")]
    list_placeholder: Option<&'static str>,
    stats: Stats,
}

/// Recompute the filtered view and push it to map, list and counters.
/// Runs after every mutation, sequenced behind the persistence write.
fn refresh(state: &AppState, app: &tauri::AppHandle) -> RefreshPayload {
    let now = Local::now();
    let store = state.store.lock().unwrap();
    let filter = state.filter.lock().unwrap();
    let visible = filter.apply(store.all(), now);

    let mut map = state.map.lock().unwrap();
    map.sync(visible.iter().copied(), &mut WebviewMap { app });

    let list = view::list_entries(visible.iter().copied());
    RefreshPayload {
        markers: map.markers().to_vec(),
        list_placeholder: list.is_empty().then_some(view::EMPTY_LIST_PLACEHOLDER),
        list,
        stats: view::stats(store.all(), now),
    }
}

fn validate_submission(input: &NewAlert) -> Result<(), String> {
    if input.address.trim().is_empty() {
        return Err("Digite um endereço primeiro!".to_string());
    }
    if input.description.trim().is_empty() {
        return Err("Descreva a ocorrência.".to_string());
    }
    if !input.latitude.is_finite() || !input.longitude.is_finite() {
        return Err("Coordenadas inválidas. Busque o endereço ou clique no mapa.".to_string());
    }
    if input.severity == Severity::Desconhecida {
        return Err("Severidade inválida.".to_string());
    }
    Ok(())
}

#[tauri::command]
fn submit_alert(
    input: NewAlert,
    state: State<'_, AppState>,
    app: tauri::AppHandle,
) -> Result<RefreshPayload, String> {
    validate_submission(&input)?;
    {
        let mut store = state.store.lock().unwrap();
        let alert = store.append(input, Local::now());
        log::info!("registered alert #{} ({})", alert.id, alert.kind.label());
        state.storage.save(store.all()).map_err(|e| e.to_string())?;
    }
    Ok(refresh(&state, &app))
}

#[tauri::command]
fn set_filter(
    filter: AlertFilter,
    state: State<'_, AppState>,
    app: tauri::AppHandle,
) -> Result<RefreshPayload, String> {
    *state.filter.lock().unwrap() = filter;
    Ok(refresh(&state, &app))
}

#[tauri::command]
fn clear_alerts(state: State<'_, AppState>, app: tauri::AppHandle) -> Result<RefreshPayload, String> {
    {
        let mut store = state.store.lock().unwrap();
        store.clear();
        state.storage.save(store.all()).map_err(|e| e.to_string())?;
        log::info!("cleared all alerts");
    }
    Ok(refresh(&state, &app))
}

/// Startup path: the webview asks for the current board once the map is up.
#[tauri::command]
fn current_view(state: State<'_, AppState>, app: tauri::AppHandle) -> Result<RefreshPayload, String> {
    Ok(refresh(&state, &app))
}

#[tauri::command]
async fn geocode_address(
    address: String,
    state: State<'_, AppState>,
) -> Result<GeocodeHit, String> {
    let address = address.trim().to_string();
    if address.is_empty() {
        return Err("Digite um endereço primeiro!".to_string());
    }
    state.geocoder.lookup(&address).await.map_err(|e| match e {
        GeocodeError::NotFound => {
            "Endereço não encontrado. Tente ser mais específico (Ex: Rua X, Cidade, Estado)"
                .to_string()
        }
        other => {
            log::warn!("geocode failed: {other}");
            "Erro ao buscar coordenadas. Verifique sua conexão.".to_string()
        }
    })
}

/// Pick an image and return it as a data URI, or `None` if the user cancels.
#[tauri::command]
async fn attach_photo(app: tauri::AppHandle) -> Result<Option<String>, String> {
    // Blocking dialog + file read off the async runtime.
    tauri::async_runtime::spawn_blocking(move || {
        let Some(picked) = app.dialog().file().blocking_pick_file() else {
            return Ok(None);
        };
        let path = picked.into_path().map_err(|e| e.to_string())?;
        photo::photo_data_uri(&path)
            .map(Some)
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

#[tauri::command]
async fn export_report(
    state: State<'_, AppState>,
    app: tauri::AppHandle,
) -> Result<PathBuf, String> {
    let alerts = state.store.lock().unwrap().all().to_vec();
    if alerts.is_empty() {
        return Err("Não há ocorrências para exportar!".to_string());
    }

    let picked = tauri::async_runtime::spawn_blocking({
        let app = app.clone();
        move || app.dialog().file().blocking_pick_folder()
    })
    .await
    .map_err(|e| e.to_string())?;

    let Some(folder) = picked else {
        return Err("Exportação cancelada.".to_string());
    };
    let out_dir = folder.into_path().map_err(|e| e.to_string())?;

    tauri::async_runtime::spawn_blocking(move || {
        report::export_report(&alerts, &out_dir, Local::now()).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
    .map(|path| {
        log::info!("report written to {path:?}");
        path
    })
}

#[tauri::command]
fn get_settings(state: State<'_, AppState>) -> Settings {
    state.settings.lock().unwrap().clone()
}

#[tauri::command]
fn save_settings(settings: Settings, state: State<'_, AppState>) -> Result<(), String> {
    let mut current = state.settings.lock().unwrap();
    *current = settings.clone();
    state.config_manager.save(&settings).map_err(|e| e.to_string())
}

pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            // Initialize Config
            let config_dir = app.path().app_config_dir().unwrap_or(PathBuf::from("."));
            let config_manager = ConfigManager::new(config_dir);
            let settings = config_manager.load();

            let data_dir = app.path().app_data_dir().unwrap_or(PathBuf::from("."));
            let storage = AlertStorage::new(data_dir);
            let store = AlertStore::from_saved(storage.load());
            println!("Loaded {} stored alerts.", store.len());

            app.manage(AppState {
                store: Mutex::new(store),
                filter: Mutex::new(AlertFilter::default()),
                map: Mutex::new(MapSyncEngine::new()),
                storage,
                settings: Mutex::new(settings),
                config_manager,
                geocoder: GeocodeClient::new(),
            });

            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            app.handle().plugin(tauri_plugin_dialog::init())?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            submit_alert,
            set_filter,
            clear_alerts,
            current_view,
            geocode_address,
            attach_photo,
            export_report,
            get_settings,
            save_settings
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
