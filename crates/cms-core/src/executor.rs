//! Command executor
//!
//! Dispatches a [`CommandDescriptor`] to its action handler and records one
//! audit entry for every attempt.
//!
//! ```text
//! text ─parse─► CommandDescriptor ─dispatch─► handler ─► collaborator ─► CommandOutput
//!                     │                          │
//!                     └──────── audit (success or failure, best-effort) ◄──┘
//! ```
//!
//! `create_page` validates blocks strictly in layout order and stops at the
//! first failure, before anything is persisted.

use crate::alias;
use crate::audit::{AuditEntry, UNPARSED_ACTION};
use crate::collaborators::Collaborators;
use crate::config::CmsConfig;
use crate::effect::{non_fatal, non_fatal_async};
use crate::error::{CommandError, CommandResult};
use crate::types::{
    derive_slug, Block, ComponentRecord, ContactRecord, NewComponent, NewPage, PageRecord,
    PageStatus, PageTarget,
};
use cms_command::{parse, CommandAction, CommandDescriptor, CommandRequest};
use cms_schema::{run, BlockContext, CompiledSchema, SchemaCache};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CommandOutput {
    /// Created or published page
    Page(PageRecord),
    /// Registered component
    Component(ComponentRecord),
    /// Contact submissions, newest first
    Contacts(Vec<ContactRecord>),
    /// Updated contact submission
    Contact(ContactRecord),
    /// Page that was deleted
    DeletedPage {
        /// Id of the removed page
        id: String,
        /// Path the page occupied
        path: String,
    },
}

impl CommandOutput {
    /// Id of the resource the command produced or touched
    #[must_use]
    pub fn resource_id(&self) -> Option<String> {
        match self {
            Self::Page(page) => Some(page.id.clone()),
            Self::Component(component) => Some(component.id.clone()),
            Self::Contact(contact) => Some(contact.id.clone()),
            Self::DeletedPage { id, .. } => Some(id.clone()),
            Self::Contacts(_) => None,
        }
    }

    /// Summary recorded in the audit entry
    #[must_use]
    pub fn audit_details(&self) -> Value {
        match self {
            Self::Page(page) => json!({ "path": page.path, "status": page.status }),
            Self::Component(component) => json!({ "type": component.component_type }),
            Self::Contacts(contacts) => json!({ "count": contacts.len() }),
            Self::Contact(contact) => json!({ "read": contact.read }),
            Self::DeletedPage { path, .. } => json!({ "path": path }),
        }
    }
}

/// Executes admin commands against a collaborator set
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    config: Arc<CmsConfig>,
    schemas: SchemaCache,
    collaborators: Collaborators,
}

impl CommandExecutor {
    /// Create executor; the schema cache is sized from `config`
    #[must_use]
    pub fn new(config: CmsConfig, collaborators: Collaborators) -> Self {
        Self {
            schemas: config.schema_cache(),
            config: Arc::new(config),
            collaborators,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// Memoized compiled schemas
    #[inline]
    #[must_use]
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Parse and execute one line of command text
    ///
    /// # Errors
    /// Returns the [`CommandError`] of the failing stage; a parse failure is
    /// audited under [`UNPARSED_ACTION`].
    pub async fn execute(&self, command: &str, actor: Option<&str>) -> CommandResult<CommandOutput> {
        tracing::info!(command, actor, "command received");

        let descriptor = match parse(command) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                let err = CommandError::from(err);
                self.audit_failure(actor, UNPARSED_ACTION, None, command, &err)
                    .await;
                return Err(err);
            }
        };

        self.execute_descriptor(&descriptor, actor).await
    }

    /// Execute a structured request, bypassing the text grammar
    ///
    /// # Errors
    /// Returns [`CommandError::UnsupportedAction`] for actions outside the
    /// action table, otherwise as [`Self::execute_descriptor`].
    pub async fn execute_request(
        &self,
        request: CommandRequest,
        actor: Option<&str>,
    ) -> CommandResult<CommandOutput> {
        let command = request.command_text();
        let action = request.action.clone();

        match CommandDescriptor::try_from(request) {
            Ok(descriptor) => self.execute_descriptor(&descriptor, actor).await,
            Err(err) => {
                let err = CommandError::from(err);
                self.audit_failure(actor, &action, None, &command, &err).await;
                Err(err)
            }
        }
    }

    /// Execute a parsed descriptor and audit the outcome
    ///
    /// # Errors
    /// Returns the handler's [`CommandError`]; audit failures never surface.
    pub async fn execute_descriptor(
        &self,
        descriptor: &CommandDescriptor,
        actor: Option<&str>,
    ) -> CommandResult<CommandOutput> {
        let action = descriptor.action();
        tracing::debug!(action = %action, "command parsed");

        let result = self.dispatch(descriptor, actor).await;

        match &result {
            Ok(output) => {
                tracing::info!(action = %action, resource = ?output.resource_id(), "command succeeded");
                let entry = AuditEntry::new(actor, action.as_str(), descriptor.raw(), true)
                    .with_resource(Some(action.resource_type()), output.resource_id())
                    .with_details(output.audit_details());
                self.record_audit(entry).await;
            }
            Err(err) => {
                tracing::info!(action = %action, status = err.status(), error = %err, "command failed");
                self.audit_failure(
                    actor,
                    action.as_str(),
                    Some(action.resource_type()),
                    descriptor.raw(),
                    err,
                )
                .await;
            }
        }

        result
    }

    async fn dispatch(
        &self,
        descriptor: &CommandDescriptor,
        actor: Option<&str>,
    ) -> CommandResult<CommandOutput> {
        let payload = descriptor.payload();
        match descriptor.action() {
            CommandAction::CreatePage => self.create_page(payload, actor).await,
            CommandAction::PublishPage => self.publish_page(payload, actor).await,
            CommandAction::DeletePage => self.delete_page(payload).await,
            CommandAction::CreateComponent => self.create_component(payload).await,
            CommandAction::ListContacts => self.list_contacts(payload).await,
            CommandAction::MarkContactRead => self.mark_contact_read(payload).await,
        }
    }

    async fn create_page(
        &self,
        payload: &Map<String, Value>,
        actor: Option<&str>,
    ) -> CommandResult<CommandOutput> {
        let path = required_str(payload, "path", "Page path is required")?;
        let Some(Value::Array(raw_layout)) = payload.get("layout") else {
            return Err(CommandError::invalid_payload("layout must be an array"));
        };

        let mut layout = Vec::with_capacity(raw_layout.len());
        for (index, raw) in raw_layout.iter().enumerate() {
            layout.push(self.validate_block(index, raw).await?);
        }

        let slug = derive_slug(path);
        let title = optional_str(payload, "title").map_or_else(|| slug.clone(), str::to_string);
        let page = NewPage {
            path: path.to_string(),
            slug,
            title,
            status: PageStatus::Draft,
            layout,
        };

        let record = self
            .collaborators
            .pages
            .create(page, actor.map(str::to_string))
            .await?;
        tracing::info!(id = %record.id, path = %record.path, blocks = record.layout.len(), "page persisted");
        Ok(CommandOutput::Page(record))
    }

    async fn validate_block(&self, index: usize, raw: &Value) -> CommandResult<Block> {
        let block_type = raw
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CommandError::invalid_payload(format!("Block at index {index} is missing a type"))
            })?;

        let mut props = match raw.get("props") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(props) => props.clone(),
        };

        let component = self
            .collaborators
            .components
            .get_by_type(block_type)
            .await?
            .ok_or_else(|| {
                CommandError::Reference(format!(
                    "Unknown component type \"{block_type}\" at block {index}"
                ))
            })?;

        let Some(definition) = component.props_schema.as_ref().filter(|s| !s.is_null()) else {
            tracing::debug!(index, block_type, "no props schema, block accepted as-is");
            return Ok(Block {
                block_type: block_type.to_string(),
                props,
            });
        };

        non_fatal("alias normalization", alias::normalize(&mut props, definition));

        let Some(schema) = non_fatal_async("schema compilation", self.schemas.compile(definition)).await
        else {
            tracing::warn!(index, block_type, "props schema did not compile, skipping strict validation");
            return Ok(Block {
                block_type: block_type.to_string(),
                props,
            });
        };

        self.check_unknown_tags(&schema, block_type)?;

        let validated = run(&schema, &props, BlockContext::new(block_type, index))?;
        tracing::debug!(index, block_type, attempt = ?validated.attempt, "block validated");

        Ok(Block {
            block_type: block_type.to_string(),
            props: validated.data,
        })
    }

    fn check_unknown_tags(&self, schema: &CompiledSchema, component_type: &str) -> CommandResult<()> {
        if !schema.has_unknown_tags() {
            return Ok(());
        }

        if self.config.reject_unknown_tags {
            return Err(CommandError::InvalidPayload {
                message: format!("Props schema for {component_type} uses unknown types"),
                details: Some(json!({ "unknownTags": schema.unknown_tags() })),
            });
        }

        for unknown in schema.unknown_tags() {
            tracing::warn!(
                component = component_type,
                path = %unknown.path,
                tag = %unknown.tag,
                "unknown schema tag accepted as any"
            );
        }
        Ok(())
    }

    async fn publish_page(
        &self,
        payload: &Map<String, Value>,
        actor: Option<&str>,
    ) -> CommandResult<CommandOutput> {
        let page = self.resolve_page(payload).await?;
        let published = self
            .collaborators
            .pages
            .publish(&page.id, actor.map(str::to_string))
            .await?;
        Ok(CommandOutput::Page(published))
    }

    async fn delete_page(&self, payload: &Map<String, Value>) -> CommandResult<CommandOutput> {
        let page = self.resolve_page(payload).await?;
        self.collaborators.pages.delete(&page.id).await?;
        Ok(CommandOutput::DeletedPage {
            id: page.id,
            path: page.path,
        })
    }

    async fn resolve_page(&self, payload: &Map<String, Value>) -> CommandResult<PageRecord> {
        let target = required_str(payload, "target", "Page path or id is required")?;
        let pages = &self.collaborators.pages;

        let found = match PageTarget::parse(target) {
            PageTarget::Id(id) => pages.find_by_id(&id).await?,
            PageTarget::Path(path) => pages.find_by_path(&path).await?,
        };
        found.ok_or_else(|| CommandError::NotFound("Page not found".into()))
    }

    async fn create_component(&self, payload: &Map<String, Value>) -> CommandResult<CommandOutput> {
        let component_type = required_str(payload, "type", "Component type is required")?;
        let display_name = optional_str(payload, "displayName").unwrap_or(component_type);

        let props_schema = match payload.get("propsSchema") {
            None | Some(Value::Null) => None,
            Some(schema @ Value::Object(_)) => {
                if let Some(compiled) =
                    non_fatal_async("schema compilation", self.schemas.compile(schema)).await
                {
                    self.check_unknown_tags(&compiled, component_type)?;
                }
                Some(schema.clone())
            }
            Some(_) => {
                return Err(CommandError::invalid_payload(
                    "propsSchema must be a JSON object",
                ))
            }
        };

        let mut component = NewComponent::new(component_type).with_display_name(display_name);
        component.props_schema = props_schema;

        let record = self.collaborators.components.create(component).await?;
        Ok(CommandOutput::Component(record))
    }

    async fn list_contacts(&self, payload: &Map<String, Value>) -> CommandResult<CommandOutput> {
        let limit = self
            .config
            .contact_limit(payload.get("limit").and_then(Value::as_u64));
        let contacts = self.collaborators.contacts.list(limit).await?;
        Ok(CommandOutput::Contacts(contacts))
    }

    async fn mark_contact_read(&self, payload: &Map<String, Value>) -> CommandResult<CommandOutput> {
        let id = required_str(payload, "id", "Contact id is required")?;
        self.collaborators
            .contacts
            .mark_read(id)
            .await?
            .map(CommandOutput::Contact)
            .ok_or_else(|| CommandError::NotFound("Contact submission not found".into()))
    }

    async fn audit_failure(
        &self,
        actor: Option<&str>,
        action: &str,
        resource_type: Option<&str>,
        command: &str,
        err: &CommandError,
    ) {
        let entry = AuditEntry::new(actor, action, command, false)
            .with_resource(resource_type, None)
            .with_details(err.to_json());
        self.record_audit(entry).await;
    }

    async fn record_audit(&self, entry: AuditEntry) {
        non_fatal_async("audit write", self.collaborators.audit.record(entry)).await;
    }
}

fn optional_str<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn required_str<'a>(
    payload: &'a Map<String, Value>,
    key: &str,
    message: &'static str,
) -> CommandResult<&'a str> {
    optional_str(payload, key).ok_or_else(|| CommandError::invalid_payload(message))
}
