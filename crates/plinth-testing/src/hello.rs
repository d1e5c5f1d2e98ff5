//! Fixed-greeting hello component.

use async_trait::async_trait;

use plinth_core::hello::{Hello, HelloError, HelloRequest, HelloResponse};

/// Hello service replying `"<greeting>, <name>"`.
pub struct GreetingHello {
    greeting: String,
}

impl GreetingHello {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

#[async_trait]
impl Hello for GreetingHello {
    async fn hello(&self, req: HelloRequest) -> Result<HelloResponse, HelloError> {
        Ok(HelloResponse {
            greeting: if req.name.is_empty() {
                self.greeting.clone()
            } else {
                format!("{}, {}", self.greeting, req.name)
            },
        })
    }
}
