use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use langid_core::io::list_files;
use langid_core::{
	Classification, Classifier, LangIdConfig, LangIdError, LanguageModel, MemorySink, NullSink, Order,
};

/// Optional configuration file read at startup.
const CONFIG_FILE: &str = "langid.json";

/// Query parameters of the `/v1/classify` endpoint
#[derive(Deserialize)]
struct ClassifyParams {
	query: Option<String>,
	order: Option<usize>, // 1, 2 or 3; all three when absent
	trace: Option<bool>,
}

#[derive(Deserialize)]
struct LanguageQuery {
	names: Option<String>,
}

#[derive(Serialize)]
struct ClassifyResponse {
	query: String,
	results: Vec<Classification>,
	#[serde(skip_serializing_if = "Option::is_none")]
	report: Option<String>,
}

struct SharedData {
	config: LangIdConfig,
	classifier: Classifier,
}

/// Maps a core error to the matching HTTP status.
fn error_response(e: LangIdError) -> HttpResponse {
	match e {
		LangIdError::ModelKeyMissing { .. } | LangIdError::InvalidOrder(_) | LangIdError::DuplicateLanguage(_) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		LangIdError::NoLanguages | LangIdError::UnknownLanguage(_) => HttpResponse::Conflict().body(e.to_string()),
		_ => {
			error!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/classify`
///
/// Ranks the loaded languages for `query`, at one order or at all three.
/// With `trace=true` the human-readable report is returned as well.
#[get("/v1/classify")]
async fn get_classified(data: web::Data<Mutex<SharedData>>, params: web::Query<ClassifyParams>) -> impl Responder {
	let query = match &params.query {
		Some(q) => q.clone(),
		None => return HttpResponse::BadRequest().body("Missing query"),
	};

	let order = match params.order.map(Order::try_from).transpose() {
		Ok(order) => order,
		Err(e) => return error_response(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	let with_trace = params.trace.unwrap_or(false);
	let mut memory = MemorySink::new();
	let outcome = match (order, with_trace) {
		(Some(order), true) => shared_data.classifier.classify(order, &query, &mut memory).map(|c| vec![c]),
		(Some(order), false) => shared_data.classifier.classify(order, &query, &mut NullSink).map(|c| vec![c]),
		(None, true) => shared_data.classifier.classify_all(&query, &mut memory),
		(None, false) => shared_data.classifier.classify_all(&query, &mut NullSink),
	};

	match outcome {
		Ok(results) => HttpResponse::Ok().json(ClassifyResponse {
			query,
			results,
			report: with_trace.then(|| memory.into_contents()),
		}),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/languages`: corpora available in the data folder
#[get("/v1/languages")]
async fn get_languages(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let (data_dir, extension) = match data.lock() {
		Ok(m) => (m.config.data_dir.clone(), m.config.corpus_extension.clone()),
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};
	match list_files(&data_dir, &extension) {
		Ok(files) => HttpResponse::Ok().body(
			files
				.iter()
				.map(|file| file.trim_end_matches(&format!(".{extension}")).to_owned())
				.collect::<Vec<_>>()
				.join("\n"),
		),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list languages"),
	}
}

/// HTTP GET endpoint `/v1/loaded_languages`: languages the classifier ranks
#[get("/v1/loaded_languages")]
async fn get_loaded_languages(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};
	HttpResponse::Ok().body(shared_data.classifier.language_names().join("\n"))
}

/// Builds a classifier over `names`, read from `<data_dir>/<name>.<extension>`.
///
/// Names are trimmed and empty entries skipped; the given order is the
/// tie-break order.
fn build_classifier(config: &LangIdConfig, names: &str) -> Result<Classifier, LangIdError> {
	let mut classifier = Classifier::default();
	classifier.set_case_policy(config.case_policy);
	for name in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
		let corpus_path = config.data_dir.join(format!("{}.{}", name, config.corpus_extension));
		classifier.add_language(LanguageModel::new(&corpus_path, config.use_cache)?)?;
	}
	Ok(classifier)
}

/// HTTP PUT endpoint `/v1/load_languages?names=english,french`
///
/// Replaces the candidate set; languages are ranked in the given order on ties.
/// Models are built on the blocking pool without holding the classifier lock,
/// so classification requests keep being served meanwhile.
#[put("/v1/load_languages")]
async fn put_languages(data: web::Data<Mutex<SharedData>>, query: web::Query<LanguageQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty language name"),
	};

	let config = match data.lock() {
		Ok(m) => m.config.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};

	let classifier = match web::block(move || build_classifier(&config, &query_names)).await {
		Ok(Ok(classifier)) => classifier,
		Ok(Err(e)) => return error_response(e),
		Err(_) => return HttpResponse::InternalServerError().body("Language loading was interrupted"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Classifier lock failed"),
	};
	info!("candidate languages: {}", classifier.language_names().join(", "));
	shared_data.classifier = classifier;
	HttpResponse::Ok().body("Languages loaded successfully")
}

/// Main entry point for the server.
///
/// Reads `langid.json` when present, loads every corpus of the data folder,
/// wraps the classifier in a `Mutex` and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - A data folder that cannot be loaded leaves the server up with no
///   language; `/v1/load_languages` can fill it later.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = if Path::new(CONFIG_FILE).exists() {
		LangIdConfig::load(CONFIG_FILE).map_err(std::io::Error::other)?
	} else {
		LangIdConfig::default()
	};

	let classifier = match Classifier::from_config(&config) {
		Ok(classifier) => classifier,
		Err(e) => {
			warn!("starting without languages: {e}");
			let mut classifier = Classifier::default();
			classifier.set_case_policy(config.case_policy);
			classifier
		}
	};
	info!("serving {} language(s)", classifier.language_names().len());

	let shared_data = web::Data::new(Mutex::new(SharedData { config, classifier }));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_classified)
			.service(get_languages)
			.service(get_loaded_languages)
			.service(put_languages)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
