//! People directory demo.
//!
//! Registers a CRUD namespace, a `person -> pet` relation, discovery and
//! Swagger on one application, then drives a handful of requests through it
//! in-process and prints the responses.
//!
//! Configuration comes from `.env` and `MERIDIAN__*` variables, e.g.
//! `MERIDIAN__ROUTE__PATH_PREFIX=/v2`.

use std::sync::{Arc, RwLock};

use bytes::Bytes;
use http::{Method, Request};
use meridian::core::Links;
use meridian::prelude::*;
use meridian_telemetry::init_logging;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

// =============================================================================
// Storage
// =============================================================================

/// In-memory records keyed by insertion order.
#[derive(Debug, Default)]
struct Directory {
    people: RwLock<Vec<Record>>,
    pets: RwLock<Vec<Record>>,
}

fn text<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn paginate(items: Vec<Record>, input: &Record) -> SearchResult {
    let page = Page::from_record(input, 20);
    let count = items.len() as u64;
    let offset = usize::try_from(page.offset).unwrap_or(0);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    SearchResult::new(items.into_iter().skip(offset).take(limit).collect(), count)
}

fn internal(message: &str) -> MeridianError {
    MeridianError::internal(message)
}

impl Directory {
    fn people(&self) -> MeridianResult<Vec<Record>> {
        self.people
            .read()
            .map(|people| people.clone())
            .map_err(|_| internal("people lock poisoned"))
    }

    fn find(&self, id: &str) -> MeridianResult<Option<Record>> {
        Ok(self.people()?.into_iter().find(|p| text(p, "id") == id))
    }

    fn create(&self, input: &Record) -> MeridianResult<Record> {
        let mut person = Record::new();
        person.insert("id".into(), Uuid::now_v7().to_string().into());
        for key in ["name", "email"] {
            if let Some(value) = input.get(key) {
                person.insert(key.into(), value.clone());
            }
        }
        self.people
            .write()
            .map_err(|_| internal("people lock poisoned"))?
            .push(person.clone());
        Ok(person)
    }

    fn update(&self, id: &str, input: &Record) -> MeridianResult<Option<Record>> {
        let mut people = self
            .people
            .write()
            .map_err(|_| internal("people lock poisoned"))?;
        let Some(person) = people.iter_mut().find(|p| text(p, "id") == id) else {
            return Ok(None);
        };
        for key in ["name", "email"] {
            if let Some(value) = input.get(key) {
                person.insert(key.into(), value.clone());
            }
        }
        Ok(Some(person.clone()))
    }

    fn remove(&self, id: &str) -> MeridianResult<bool> {
        let mut people = self
            .people
            .write()
            .map_err(|_| internal("people lock poisoned"))?;
        let before = people.len();
        people.retain(|p| text(p, "id") != id);
        Ok(people.len() < before)
    }

    fn adopt(&self, person_id: &str, input: &Record) -> MeridianResult<Option<Record>> {
        if self.find(person_id)?.is_none() {
            return Ok(None);
        }
        let mut pet = Record::new();
        pet.insert("id".into(), Uuid::now_v7().to_string().into());
        pet.insert("person_id".into(), person_id.into());
        pet.insert("name".into(), text(input, "name").into());
        self.pets
            .write()
            .map_err(|_| internal("pets lock poisoned"))?
            .push(pet.clone());
        Ok(Some(pet))
    }

    fn pets_of(&self, person_id: &str) -> MeridianResult<Vec<Record>> {
        Ok(self
            .pets
            .read()
            .map_err(|_| internal("pets lock poisoned"))?
            .iter()
            .filter(|pet| text(pet, "person_id") == person_id)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Schemas
// =============================================================================

fn person_ns() -> Namespace {
    Namespace::new("person").with_version("v1")
}

fn pet_ns() -> Namespace {
    Namespace::relation("person", "pet").with_version("v1")
}

fn new_person_schema() -> Arc<Schema> {
    Schema::new("NewPersonSchema")
        .field(Field::string("name").required())
        .field(Field::string("email").with_description("Contact address"))
        .shared()
}

fn person_schema() -> Arc<Schema> {
    Schema::new("PersonSchema")
        .field(Field::uuid("id").required())
        .field(Field::string("name").required())
        .field(Field::string("email").allow_none())
        .field(Field::links(|record, urls| {
            let id = text(record, "id");
            let mut links = Links::new();
            links.insert(
                "self",
                Link::to(Operation::Retrieve, &person_ns())
                    .param("person_id", id)
                    .resolve(urls)?,
            );
            links.insert(
                "pets",
                Link::to(Operation::SearchFor, &pet_ns())
                    .param("person_id", id)
                    .resolve(urls)?,
            );
            Ok(links.to_value())
        }))
        .shared()
}

fn new_pet_schema() -> Arc<Schema> {
    Schema::new("NewPetSchema")
        .field(Field::string("name").required())
        .shared()
}

fn pet_schema() -> Arc<Schema> {
    Schema::new("PetSchema")
        .field(Field::uuid("id").required())
        .field(Field::uuid("person_id").wire_name("personId").required())
        .field(Field::string("name").required())
        .shared()
}

// =============================================================================
// Wiring
// =============================================================================

fn person_mappings(directory: &Arc<Directory>) -> Mappings {
    let search = Arc::clone(directory);
    let create = Arc::clone(directory);
    let retrieve = Arc::clone(directory);
    let delete = Arc::clone(directory);
    let update = Arc::clone(directory);

    Mappings::new()
        .with(
            Operation::Search,
            (
                Handler::search(move |input| Ok(paginate(search.people()?, &input))),
                person_schema(),
            ),
        )
        .with(
            Operation::Create,
            (
                Handler::item(move |input| create.create(&input).map(Some)),
                new_person_schema(),
                person_schema(),
            ),
        )
        .with(
            Operation::Retrieve,
            (
                Handler::item(move |input| retrieve.find(text(&input, "person_id"))),
                person_schema(),
            ),
        )
        .with(
            Operation::Delete,
            Handler::delete(move |input| delete.remove(text(&input, "person_id"))),
        )
        .with(
            Operation::Update,
            (
                Handler::item(move |input| update.update(text(&input, "person_id"), &input)),
                new_person_schema(),
                person_schema(),
            ),
        )
}

fn pet_mappings(directory: &Arc<Directory>) -> Mappings {
    let search = Arc::clone(directory);
    let create = Arc::clone(directory);

    Mappings::new()
        .with(
            Operation::SearchFor,
            (
                Handler::search(move |input| {
                    let person_id = text(&input, "person_id").to_string();
                    let pets = search.pets_of(&person_id)?;
                    Ok(paginate(pets, &input).context("person_id", person_id))
                }),
                pet_schema(),
            ),
        )
        .with(
            Operation::CreateFor,
            (
                Handler::item(move |input| create.adopt(text(&input, "person_id"), &input)),
                new_pet_schema(),
                pet_schema(),
            ),
        )
}

fn build(config: MeridianConfig, directory: &Arc<Directory>) -> MeridianResult<Application> {
    let mut app = Application::new(config);
    configure_crud(&mut app, &person_ns(), person_mappings(directory))?;
    configure_relation(&mut app, &pet_ns(), pet_mappings(directory))?;
    let discovery = configure_discovery(&mut app)?;
    let swagger = configure_swagger(&mut app)?;
    info!(
        endpoints = app.endpoints().count(),
        discovery = %discovery,
        swagger = %swagger.path(),
        "application configured"
    );
    Ok(app)
}

// =============================================================================
// Driver
// =============================================================================

fn send(app: &Application, method: Method, uri: &str, body: Option<&Value>) -> anyhow::Result<Value> {
    let payload = body.map_or_else(Bytes::new, |body| Bytes::from(body.to_string()));
    let request = Request::builder()
        .method(method.clone())
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(payload)?;
    let response = app.call(request);
    let status = response.status();
    let value = if response.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(response.body())?
    };
    println!("{method} {uri} -> {status}");
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(value)
}

fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_development()
        .with_dotenv()?
        .with_env_prefix("MERIDIAN")
        .load()?;
    init_logging(&config.logging)?;

    let prefix = config.route.path_prefix.clone();
    let directory = Arc::new(Directory::default());
    let app = build(config, &directory)?;

    let people = format!("{prefix}/v1/person");
    let ada = send(
        &app,
        Method::POST,
        &people,
        Some(&json!({"name": "Ada Lovelace", "email": "ada@example.com"})),
    )?;
    send(&app, Method::POST, &people, Some(&json!({"name": "Alan Turing"})))?;

    let ada_id = ada["id"].as_str().unwrap_or_default();
    send(
        &app,
        Method::POST,
        &format!("{people}/{ada_id}/pet"),
        Some(&json!({"name": "Byron"})),
    )?;
    send(
        &app,
        Method::PATCH,
        &format!("{people}/{ada_id}"),
        Some(&json!({"email": "countess@example.com"})),
    )?;

    send(&app, Method::GET, &format!("{people}?limit=1"), None)?;
    send(&app, Method::GET, &format!("{people}/{ada_id}/pet"), None)?;
    send(&app, Method::GET, &format!("{prefix}/all"), None)?;
    send(&app, Method::GET, &format!("{prefix}/v1/swagger"), None)?;
    Ok(())
}
