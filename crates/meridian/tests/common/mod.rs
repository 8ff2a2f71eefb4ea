//! Shared fixtures: an in-memory people and addresses service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use meridian::core::Links;
use meridian::prelude::*;
use meridian_test::TestClient;
use serde_json::Value;
use uuid::Uuid;

pub const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

pub fn person_ns() -> Namespace {
    Namespace::new("person").with_version("v1")
}

pub fn address_ns() -> Namespace {
    Namespace::relation("person", "address").with_version("v1")
}

pub fn new_person_schema() -> Arc<Schema> {
    Schema::new("NewPersonSchema")
        .field(Field::string("first_name").wire_name("firstName").required())
        .field(Field::string("last_name").wire_name("lastName").required())
        .shared()
}

pub fn person_schema() -> Arc<Schema> {
    Schema::new("PersonSchema")
        .field(Field::uuid("id").required())
        .field(Field::string("first_name").wire_name("firstName").required())
        .field(Field::string("last_name").wire_name("lastName").required())
        .field(Field::links(|record, urls| {
            let id = record.get("id").and_then(Value::as_str).unwrap_or_default();
            let mut links = Links::new();
            links.insert(
                "self",
                Link::to(Operation::Retrieve, &person_ns())
                    .param("person_id", id)
                    .resolve(urls)?,
            );
            Ok(links.to_value())
        }))
        .shared()
}

pub fn new_address_schema() -> Arc<Schema> {
    Schema::new("NewAddressSchema")
        .field(Field::string("street").required())
        .shared()
}

pub fn address_schema() -> Arc<Schema> {
    Schema::new("AddressSchema")
        .field(Field::uuid("id").required())
        .field(Field::uuid("person_id").wire_name("personId").required())
        .field(Field::string("street").required())
        .shared()
}

/// In-memory storage shared by the handlers.
#[derive(Debug, Default)]
pub struct Store {
    people: Mutex<Vec<Record>>,
    addresses: Mutex<Vec<Record>>,
}

fn text<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn page_of(items: Vec<Record>, record: &Record) -> SearchResult {
    let page = Page::from_record(record, 20);
    let count = items.len() as u64;
    let offset = usize::try_from(page.offset).unwrap();
    let limit = usize::try_from(page.limit).unwrap();
    SearchResult::new(items.into_iter().skip(offset).take(limit).collect(), count)
}

impl Store {
    pub fn add_person(&self, first: &str, last: &str) -> String {
        let id = Uuid::now_v7().to_string();
        let mut record = Record::new();
        record.insert("id".into(), id.clone().into());
        record.insert("first_name".into(), first.into());
        record.insert("last_name".into(), last.into());
        self.people.lock().unwrap().push(record);
        id
    }

    pub fn person_count(&self) -> usize {
        self.people.lock().unwrap().len()
    }

    fn find_person(&self, id: &str) -> Option<Record> {
        self.people
            .lock()
            .unwrap()
            .iter()
            .find(|p| text(p, "id") == id)
            .cloned()
    }

    fn update_person(&self, id: &str, fields: &Record) -> Option<Record> {
        let mut people = self.people.lock().unwrap();
        let person = people.iter_mut().find(|p| text(p, "id") == id)?;
        for key in ["first_name", "last_name"] {
            if let Some(value) = fields.get(key) {
                person.insert(key.to_string(), value.clone());
            }
        }
        Some(person.clone())
    }
}

pub fn person_mappings(store: &Arc<Store>) -> Mappings {
    let search = Arc::clone(store);
    let create = Arc::clone(store);
    let retrieve = Arc::clone(store);
    let delete = Arc::clone(store);
    let replace = Arc::clone(store);
    let update = Arc::clone(store);

    Mappings::new()
        .with(
            Operation::Search,
            (
                Handler::search(move |record| {
                    let people = search.people.lock().unwrap().clone();
                    Ok(page_of(people, &record))
                }),
                person_schema(),
            ),
        )
        .with(
            Operation::Create,
            (
                Handler::item(move |record| {
                    let id = create.add_person(text(&record, "first_name"), text(&record, "last_name"));
                    Ok(create.find_person(&id))
                }),
                new_person_schema(),
                person_schema(),
            ),
        )
        .with(
            Operation::Retrieve,
            (
                Handler::item(move |record| Ok(retrieve.find_person(text(&record, "person_id")))),
                person_schema(),
            ),
        )
        .with(
            Operation::Delete,
            Handler::delete(move |record| {
                let id = text(&record, "person_id").to_string();
                let mut people = delete.people.lock().unwrap();
                let before = people.len();
                people.retain(|p| text(p, "id") != id);
                Ok(people.len() < before)
            }),
        )
        .with(
            Operation::Replace,
            (
                Handler::item(move |record| {
                    Ok(replace.update_person(text(&record, "person_id"), &record))
                }),
                new_person_schema(),
                person_schema(),
            ),
        )
        .with(
            Operation::Update,
            (
                Handler::item(move |record| {
                    Ok(update.update_person(text(&record, "person_id"), &record))
                }),
                new_person_schema(),
                person_schema(),
            ),
        )
}

pub fn address_mappings(store: &Arc<Store>) -> Mappings {
    let search = Arc::clone(store);
    let create = Arc::clone(store);

    Mappings::new()
        .with(
            Operation::SearchFor,
            (
                Handler::search(move |record| {
                    let person_id = text(&record, "person_id").to_string();
                    let addresses: Vec<Record> = search
                        .addresses
                        .lock()
                        .unwrap()
                        .iter()
                        .filter(|a| text(a, "person_id") == person_id)
                        .cloned()
                        .collect();
                    Ok(page_of(addresses, &record).context("person_id", person_id))
                }),
                address_schema(),
            ),
        )
        .with(
            Operation::CreateFor,
            (
                Handler::item(move |record| {
                    let person_id = text(&record, "person_id").to_string();
                    if create.find_person(&person_id).is_none() {
                        return Ok(None);
                    }
                    let mut address = Record::new();
                    address.insert("id".into(), Uuid::now_v7().to_string().into());
                    address.insert("person_id".into(), person_id.into());
                    address.insert("street".into(), text(&record, "street").into());
                    create.addresses.lock().unwrap().push(address.clone());
                    Ok(Some(address))
                }),
                new_address_schema(),
                address_schema(),
            ),
        )
}

/// An application with people, addresses, discovery and Swagger.
pub fn application(config: MeridianConfig) -> (Application, Arc<Store>) {
    let store = Arc::new(Store::default());
    let mut app = Application::new(config);
    configure_crud(&mut app, &person_ns(), person_mappings(&store)).unwrap();
    configure_relation(&mut app, &address_ns(), address_mappings(&store)).unwrap();
    configure_discovery(&mut app).unwrap();
    configure_swagger(&mut app).unwrap();
    (app, store)
}

pub fn client() -> (TestClient, Arc<Store>) {
    let (app, store) = application(MeridianConfig::default());
    (TestClient::new(app), store)
}
