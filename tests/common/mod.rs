// tests/common/mod.rs
//
// Offline transport: canned responses picked by URL substring, every request recorded.
//
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use foodcli::core::Transport;
use foodcli::error::{FoodError, Result};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: String,
}

impl Request {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub type RequestLog = Rc<RefCell<Vec<Request>>>;

/// Responses per route are served in order; the last one repeats.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<Vec<(String, VecDeque<String>)>>,
    pub log: RequestLog,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url_part: &str, response: impl Into<String>) -> Self {
        {
            let mut routes = self.routes.borrow_mut();
            match routes.iter_mut().find(|(part, _)| part == url_part) {
                Some((_, queue)) => queue.push_back(response.into()),
                None => routes.push((url_part.to_string(), VecDeque::from([response.into()]))),
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.borrow().clone()
    }

    fn answer(&self, method: &'static str, url: &str, body: String) -> Result<String> {
        self.log.borrow_mut().push(Request { method, url: url.to_string(), body });
        let mut routes = self.routes.borrow_mut();
        let (_, queue) = routes
            .iter_mut()
            .find(|(part, _)| url.contains(part.as_str()))
            .ok_or_else(|| FoodError::malformed(format!("no canned response for {url}")))?;
        let reply = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };
        reply.ok_or_else(|| FoodError::malformed(format!("route for {url} is empty")))
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<String> {
        self.answer("GET", url, String::new())
    }

    fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String> {
        let body = form.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
        self.answer("POST", url, body)
    }

    fn post_body(&self, url: &str, body: String, _content_type: &str) -> Result<String> {
        self.answer("POST", url, body)
    }
}

/// Daily page embedding `grid` the way the site does.
pub fn daily_page(grid: &Value) -> String {
    format!("<html><script>\nvar initialFoodGridPM = {grid};\nrender(initialFoodGridPM);\n</script></html>")
}

pub fn grid_json() -> Value {
    serde_json::json!({
        "parentBeanId": 139410013,
        "nutrColumnHeaders": ["Cals<br/>kcal", "Protein<br/>g", "Fiber<br/>g"],
        "beanEntries": [
            {
                "beanEntryKey": {"beanEntryNo": 101},
                "bean": {"beanId": 2156966, "beanDesc": "Fever tree tonic"},
                "amountResolved": "200g",
                "nutrValues": ["80", "0", ""]
            },
            {"beanEntryKey": {"beanEntryNo": 102}, "bean": null},
            {
                "beanEntryKey": {"beanEntryNo": 104},
                "bean": {"beanId": 77, "beanDesc": "Peanut butter"},
                "amountResolved": "2tbsp",
                "nutrValues": ["1,188", "50", "12"]
            }
        ]
    })
}

pub fn oats_search_entry() -> Value {
    serde_json::json!({
        "beanId": 42,
        "descForUi": "<span class=\"sughtrm\">Oats</span>, rolled",
        "dfSrv": {"id": "3", "desc": "cup", "am": 1, "gmWgt": 81},
        "details": [
            {"nutrDesc": "Calories", "nutrValue": "379", "units": "kcal"},
            {"nutrDesc": "Protein", "nutrValue": 13.2, "units": "g"}
        ]
    })
}

pub fn write_credentials(dir: &std::path::Path) {
    std::fs::write(
        dir.join("credentials.yaml"),
        "mynetdiary:\n  username: me@example.com\n  password: secret\n",
    )
    .unwrap();
}
