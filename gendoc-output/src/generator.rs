//! Base contract shared by every concrete output generator.
//!
//! A generator embeds a [`GeneratorBase`] and implements [`OutputGenerator`].
//! Its lifecycle is `Unbound → Bound → Completed`:
//!
//! 1. The chain links it to its predecessor (while `Unbound`).
//! 2. [`GeneratorBase::copy_template_files`] provisions its template subtree.
//! 3. [`OutputGenerator::generate_output`] runs; implementations call
//!    [`GeneratorBase::bind`] before anything else.
//! 4. The chain checks the bind happened and marks the generator `Completed`.
//!
//! The predecessor link is a [`Weak`] handle: a generator can look its
//! predecessor up but never keeps it alive.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use serde::Serialize;

use gendoc_core::settings::is_confined;
use gendoc_core::Settings;

use crate::error::{write_err, OutputError};
use crate::provision::{provision, ProvisionReport};
use crate::registry::TemplateRegistry;
use crate::writer;

/// Shared handle to a generator in a chain.
pub type GeneratorRef<S> = Rc<RefCell<dyn OutputGenerator<S>>>;

/// Non-owning handle to a generator in a chain.
pub type WeakGeneratorRef<S> = Weak<RefCell<dyn OutputGenerator<S>>>;

/// Lifecycle state of a generator within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Unbound,
    Bound,
    Completed,
}

// ---------------------------------------------------------------------------
// OutputGenerator
// ---------------------------------------------------------------------------

/// Implemented by every concrete generator (html, man pages, docsets, ...).
///
/// `S` is the documentation store type; generators only ever read it.
pub trait OutputGenerator<S: ?Sized> {
    fn base(&self) -> &GeneratorBase<S>;

    fn base_mut(&mut self) -> &mut GeneratorBase<S>;

    /// Generate this generator's output.
    ///
    /// Implementations must start with `self.base_mut().bind(store)?`; the
    /// chain rejects a generator that returns while still `Unbound`. The
    /// default implementation only binds, which leaves the provisioned static
    /// assets as the generator's whole output.
    fn generate_output(&mut self, store: Rc<S>) -> Result<(), OutputError> {
        self.base_mut().bind(store)
    }

    fn name<'a>(&'a self) -> &'a str
    where
        S: 'a,
    {
        self.base().name()
    }
}

// ---------------------------------------------------------------------------
// GeneratorBase
// ---------------------------------------------------------------------------

/// State every generator carries: store binding, scoped paths, discovered
/// templates, predecessor link, and the files written so far.
pub struct GeneratorBase<S: ?Sized> {
    name: String,
    output_subpath: String,
    template_path: PathBuf,
    output_path: PathBuf,
    state: GenerationState,
    store: Option<Rc<S>>,
    previous: Option<WeakGeneratorRef<S>>,
    templates: TemplateRegistry,
    written: Vec<PathBuf>,
}

impl<S: ?Sized> GeneratorBase<S> {
    /// Create an unbound base scoped to `output_subpath` below both roots.
    pub fn new(
        name: impl Into<String>,
        settings: &Settings,
        output_subpath: &str,
    ) -> Result<Self, OutputError> {
        settings.validate()?;
        Settings::validate_subpath(output_subpath)?;
        Ok(GeneratorBase {
            name: name.into(),
            output_subpath: output_subpath.to_string(),
            template_path: settings.template_path_for(output_subpath),
            output_path: settings.output_path_for(output_subpath),
            state: GenerationState::Unbound,
            store: None,
            previous: None,
            templates: TemplateRegistry::new(),
            written: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Path relative to both roots where this generator reads and writes.
    pub fn output_subpath(&self) -> &str {
        &self.output_subpath
    }

    /// `<templates_path>/<output_subpath>`
    pub fn template_user_path(&self) -> &Path {
        &self.template_path
    }

    /// `<output_path>/<output_subpath>`
    pub fn output_user_path(&self) -> &Path {
        &self.output_path
    }

    // -- chain linkage ------------------------------------------------------

    /// Link the generator that ran just before this one. Allowed once, and
    /// only before `bind`.
    pub fn link_previous(&mut self, previous: &GeneratorRef<S>) -> Result<(), OutputError> {
        self.expect_state(GenerationState::Unbound)?;
        if self.previous.is_some() {
            return Err(OutputError::AlreadyLinked {
                generator: self.name.clone(),
            });
        }
        self.previous = Some(Rc::downgrade(previous));
        Ok(())
    }

    /// `true` if a predecessor was linked, even if it has since been dropped.
    pub fn has_previous_link(&self) -> bool {
        self.previous.is_some()
    }

    /// The generator that ran just before this one, or `None` if this is the
    /// first generator of the session (or the predecessor is gone).
    pub fn previous(&self) -> Option<GeneratorRef<S>> {
        self.previous.as_ref().and_then(Weak::upgrade)
    }

    /// Like [`previous`](Self::previous), for generators that cannot work
    /// without one.
    pub fn require_previous(&self) -> Result<GeneratorRef<S>, OutputError> {
        self.previous().ok_or_else(|| OutputError::MissingPrevious {
            generator: self.name.clone(),
        })
    }

    // -- provisioning -------------------------------------------------------

    /// Mirror this generator's template subtree into its output subtree and
    /// remember the discovered templates.
    pub fn copy_template_files(&mut self) -> Result<ProvisionReport, OutputError> {
        let report = provision(&self.template_path, &self.output_path)?;
        self.templates = report.registry.clone();
        Ok(report)
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Full registry key of the first template whose key ends with `suffix`.
    pub fn template_key_ending_with(&self, suffix: &str) -> Option<&str> {
        self.templates.key_ending_with(suffix)
    }

    // -- store binding ------------------------------------------------------

    /// `Unbound → Bound`.
    pub fn bind(&mut self, store: Rc<S>) -> Result<(), OutputError> {
        self.expect_state(GenerationState::Unbound)?;
        self.store = Some(store);
        self.state = GenerationState::Bound;
        tracing::debug!(generator = %self.name, "bound store");
        Ok(())
    }

    /// `Bound → Completed`.
    pub fn complete(&mut self) -> Result<(), OutputError> {
        self.expect_state(GenerationState::Bound)?;
        self.state = GenerationState::Completed;
        Ok(())
    }

    pub fn store(&self) -> Result<&S, OutputError> {
        self.store.as_deref().ok_or_else(|| OutputError::NotBound {
            generator: self.name.clone(),
        })
    }

    // -- writing ------------------------------------------------------------

    /// Write `content` to `path`, creating missing directories, and record
    /// the path for successors. Relative paths resolve against
    /// [`output_user_path`](Self::output_user_path) and may not contain `..`.
    pub fn write_string(&mut self, content: &str, path: impl AsRef<Path>) -> Result<PathBuf, OutputError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else if is_confined(path) {
            self.output_path.join(path)
        } else {
            return Err(write_err(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "relative path escapes the output root",
                ),
            ));
        };
        writer::write_string(content, &path)?;
        tracing::info!(generator = %self.name, path = %path.display(), "wrote");
        self.written.push(path.clone());
        Ok(path)
    }

    /// Every path written through [`write_string`](Self::write_string), in order.
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    fn expect_state(&self, expected: GenerationState) -> Result<(), OutputError> {
        if self.state != expected {
            return Err(OutputError::InvalidState {
                generator: self.name.clone(),
                expected,
                found: self.state,
            });
        }
        Ok(())
    }
}

impl<S: ?Sized> fmt::Debug for GeneratorBase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorBase")
            .field("name", &self.name)
            .field("output_subpath", &self.output_subpath)
            .field("state", &self.state)
            .field("has_previous_link", &self.previous.is_some())
            .field("templates", &self.templates.len())
            .field("written", &self.written.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AssetGenerator
// ---------------------------------------------------------------------------

/// Generator whose output is just its provisioned static assets.
#[derive(Debug)]
pub struct AssetGenerator<S: ?Sized> {
    base: GeneratorBase<S>,
}

impl<S: ?Sized> AssetGenerator<S> {
    pub fn new(settings: &Settings, output_subpath: &str) -> Result<Self, OutputError> {
        let name = if output_subpath.is_empty() {
            "assets"
        } else {
            output_subpath
        };
        Ok(AssetGenerator {
            base: GeneratorBase::new(name, settings, output_subpath)?,
        })
    }
}

impl<S: ?Sized> OutputGenerator<S> for AssetGenerator<S> {
    fn base(&self) -> &GeneratorBase<S> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut GeneratorBase<S> {
        &mut self.base
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct Store {
        title: String,
    }

    fn settings(tmp: &TempDir) -> Settings {
        Settings::new(tmp.path().join("templates"), tmp.path().join("out")).unwrap()
    }

    fn store() -> Rc<Store> {
        Rc::new(Store {
            title: "Project".to_string(),
        })
    }

    fn handle(base: GeneratorBase<Store>) -> GeneratorRef<Store> {
        Rc::new(RefCell::new(AssetGenerator { base }))
    }

    #[test]
    fn scoped_paths_include_subpath() {
        let tmp = TempDir::new().unwrap();
        let base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        assert_eq!(base.template_user_path(), tmp.path().join("templates").join("html"));
        assert_eq!(base.output_user_path(), tmp.path().join("out").join("html"));
    }

    #[test]
    fn escaping_subpath_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = GeneratorBase::<Store>::new("bad", &settings(&tmp), "../up").unwrap_err();
        assert!(matches!(err, OutputError::Config(_)), "got: {err}");
    }

    #[test]
    fn invalid_settings_are_a_config_error() {
        let bad = Settings {
            templates_path: PathBuf::from("relative"),
            output_path: PathBuf::from("/out"),
        };
        let err = GeneratorBase::<Store>::new("html", &bad, "html").unwrap_err();
        assert!(matches!(err, OutputError::Config(_)), "got: {err}");
    }

    #[test]
    fn store_requires_bind() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        assert!(matches!(base.store(), Err(OutputError::NotBound { .. })));

        base.bind(store()).unwrap();
        assert_eq!(base.state(), GenerationState::Bound);
        assert_eq!(base.store().unwrap().title, "Project");
    }

    #[test]
    fn double_bind_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        base.bind(store()).unwrap();
        let err = base.bind(store()).unwrap_err();
        assert!(matches!(
            err,
            OutputError::InvalidState {
                expected: GenerationState::Unbound,
                found: GenerationState::Bound,
                ..
            }
        ));
    }

    #[test]
    fn complete_requires_bind() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        assert!(base.complete().is_err());
        base.bind(store()).unwrap();
        base.complete().unwrap();
        assert_eq!(base.state(), GenerationState::Completed);
    }

    #[test]
    fn first_generator_has_no_previous() {
        let tmp = TempDir::new().unwrap();
        let base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        assert!(!base.has_previous_link());
        assert!(base.previous().is_none());
        assert!(matches!(
            base.require_previous(),
            Err(OutputError::MissingPrevious { .. })
        ));
    }

    #[test]
    fn previous_can_be_linked_only_once() {
        let tmp = TempDir::new().unwrap();
        let s = settings(&tmp);
        let first = handle(GeneratorBase::new("a", &s, "a").unwrap());
        let other = handle(GeneratorBase::new("b", &s, "b").unwrap());
        let mut base = GeneratorBase::<Store>::new("c", &s, "c").unwrap();

        base.link_previous(&first).unwrap();
        let err = base.link_previous(&other).unwrap_err();
        assert!(matches!(err, OutputError::AlreadyLinked { .. }), "got: {err}");
    }

    #[test]
    fn previous_cannot_be_linked_after_bind() {
        let tmp = TempDir::new().unwrap();
        let s = settings(&tmp);
        let first = handle(GeneratorBase::new("a", &s, "a").unwrap());
        let mut base = GeneratorBase::<Store>::new("b", &s, "b").unwrap();
        base.bind(store()).unwrap();
        assert!(matches!(
            base.link_previous(&first),
            Err(OutputError::InvalidState { .. })
        ));
    }

    #[test]
    fn previous_link_does_not_keep_predecessor_alive() {
        let tmp = TempDir::new().unwrap();
        let s = settings(&tmp);
        let first = handle(GeneratorBase::new("a", &s, "a").unwrap());
        let mut base = GeneratorBase::<Store>::new("b", &s, "b").unwrap();
        base.link_previous(&first).unwrap();
        assert!(base.previous().is_some());

        drop(first);
        assert!(base.previous().is_none());
        assert!(base.has_previous_link());
    }

    #[test]
    fn relative_writes_are_scoped_and_recorded() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        let written = base.write_string("<html/>", "classes/NSObject.html").unwrap();

        let expected = tmp.path().join("out").join("html").join("classes").join("NSObject.html");
        assert_eq!(written, expected);
        assert_eq!(fs::read_to_string(&expected).unwrap(), "<html/>");
        assert_eq!(base.written_files(), &[expected]);
    }

    #[test]
    fn relative_write_cannot_escape_output_root() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();

        let err = base.write_string("x", "../docset/index.html").unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }), "got: {err}");
        assert!(!tmp.path().join("out").join("docset").exists());
        assert!(base.written_files().is_empty());
    }

    #[test]
    fn name_defaults_to_base_name() {
        let tmp = TempDir::new().unwrap();
        let generator: AssetGenerator<Store> = AssetGenerator::new(&settings(&tmp), "html").unwrap();
        assert_eq!(OutputGenerator::name(&generator), "html");
    }

    #[test]
    fn failed_write_is_not_recorded() {
        let tmp = TempDir::new().unwrap();
        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "").unwrap();
        fs::create_dir_all(tmp.path().join("out")).unwrap();
        fs::write(tmp.path().join("out").join("blocker"), "file").unwrap();

        let err = base.write_string("x", "blocker/index.html").unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }), "got: {err}");
        assert!(base.written_files().is_empty());
    }

    #[test]
    fn copy_template_files_populates_registry() {
        let tmp = TempDir::new().unwrap();
        let tpl = tmp.path().join("templates").join("html");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(tpl.join("object-template.html"), "{{ name }}").unwrap();
        fs::write(tpl.join("styles.css"), "body {}").unwrap();

        let mut base = GeneratorBase::<Store>::new("html", &settings(&tmp), "html").unwrap();
        let report = base.copy_template_files().unwrap();
        assert_eq!(report.copied(), 1);
        assert_eq!(
            base.template_key_ending_with("template.html"),
            Some("object-template.html")
        );
        assert!(tmp.path().join("out").join("html").join("styles.css").exists());
    }
}
