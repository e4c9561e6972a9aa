use super::{Handler, ModuleObject};
use crate::error::{LoaderError, LoaderResult};
use crate::symbol::SymbolRef;

/// Export designated by `symbol` in an already loaded `module`
pub fn get_module_export<'m>(
    symbol: &SymbolRef,
    module: &'m ModuleObject,
) -> LoaderResult<&'m Handler> {
    let export = symbol.export_or_default();
    module.get(export).ok_or_else(|| LoaderError::MissingExport {
        reference: symbol.to_string(),
        export: export.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn symbol(s: &str) -> SymbolRef {
        SymbolRef::new(Url::parse(s).unwrap())
    }

    fn module() -> ModuleObject {
        ModuleObject::new(Url::parse("http://qwik.dev/event.js").unwrap())
    }

    #[test]
    fn test_missing_named_export() {
        let err = get_module_export(&symbol("http://qwik.dev/event.js#someExport"), &module())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "QWIK http://qwik.dev/event.js#someExport does not export someExport"
        );
    }

    #[test]
    fn test_named_export() {
        let handler = Handler::new(|_| Ok(()));
        let module = module().with_export("someExport", handler.clone());

        for s in [
            "http://qwik.dev/event.js#someExport",
            "http://qwik.dev/event.js#someExport?",
        ] {
            let found = get_module_export(&symbol(s), &module).unwrap();
            assert!(found.ptr_eq(&handler), "{}", s);
        }
    }

    #[test]
    fn test_default_export() {
        let handler = Handler::new(|_| Ok(()));
        let module = module().with_default(handler.clone());

        for s in [
            "http://qwik.dev/event.js#?",
            "http://qwik.dev/event.js?",
            "http://qwik.dev/event.js#",
            "http://qwik.dev/event.js",
        ] {
            let found = get_module_export(&symbol(s), &module).unwrap();
            assert!(found.ptr_eq(&handler), "{}", s);
        }
    }

    #[test]
    fn test_missing_default_export() {
        let err = get_module_export(&symbol("http://qwik.dev/event.js"), &module()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "QWIK http://qwik.dev/event.js does not export default"
        );
        match err {
            LoaderError::MissingExport { export, .. } => assert_eq!(export, "default"),
            other => panic!("Expected MissingExport, got {:?}", other),
        }
    }

    #[test]
    fn test_named_export_does_not_fall_back_to_default() {
        let module = module().with_default(Handler::new(|_| Ok(())));
        let result = get_module_export(&symbol("http://qwik.dev/event.js#other"), &module);
        assert!(matches!(result, Err(LoaderError::MissingExport { .. })));
    }
}
