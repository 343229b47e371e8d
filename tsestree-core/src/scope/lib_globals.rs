//! Library globals
//!
//! Names the standard declaration libraries put in the global scope. ES
//! levels are cumulative: `es2017` includes everything from `es5` onwards.

use crate::config::LibName;

/// A global name and the binding universes it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibGlobal {
    pub name: &'static str,
    pub value: bool,
    pub type_mode: bool,
}

const fn value(name: &'static str) -> LibGlobal {
    LibGlobal {
        name,
        value: true,
        type_mode: false,
    }
}

const fn ty(name: &'static str) -> LibGlobal {
    LibGlobal {
        name,
        value: false,
        type_mode: true,
    }
}

const fn both(name: &'static str) -> LibGlobal {
    LibGlobal {
        name,
        value: true,
        type_mode: true,
    }
}

const ES5: &[LibGlobal] = &[
    value("NaN"),
    value("Infinity"),
    value("eval"),
    value("parseInt"),
    value("parseFloat"),
    value("isNaN"),
    value("isFinite"),
    value("decodeURI"),
    value("decodeURIComponent"),
    value("encodeURI"),
    value("encodeURIComponent"),
    value("escape"),
    value("unescape"),
    both("Object"),
    both("Function"),
    both("String"),
    both("Boolean"),
    both("Number"),
    both("Math"),
    both("Date"),
    both("RegExp"),
    both("Error"),
    both("EvalError"),
    both("RangeError"),
    both("ReferenceError"),
    both("SyntaxError"),
    both("TypeError"),
    both("URIError"),
    both("JSON"),
    both("Array"),
    both("ArrayBuffer"),
    both("DataView"),
    both("Int8Array"),
    both("Uint8Array"),
    both("Uint8ClampedArray"),
    both("Int16Array"),
    both("Uint16Array"),
    both("Int32Array"),
    both("Uint32Array"),
    both("Float32Array"),
    both("Float64Array"),
    both("Intl"),
    ty("Symbol"),
    ty("PropertyKey"),
    ty("PropertyDescriptor"),
    ty("PropertyDescriptorMap"),
    ty("IArguments"),
    ty("CallableFunction"),
    ty("NewableFunction"),
    ty("TemplateStringsArray"),
    ty("ReadonlyArray"),
    ty("ConcatArray"),
    ty("ArrayLike"),
    ty("PromiseLike"),
    ty("Promise"),
    ty("Awaited"),
    ty("Partial"),
    ty("Required"),
    ty("Readonly"),
    ty("Pick"),
    ty("Record"),
    ty("Exclude"),
    ty("Extract"),
    ty("Omit"),
    ty("NonNullable"),
    ty("Parameters"),
    ty("ConstructorParameters"),
    ty("ReturnType"),
    ty("InstanceType"),
    ty("ThisParameterType"),
    ty("OmitThisParameter"),
    ty("ThisType"),
    ty("Uppercase"),
    ty("Lowercase"),
    ty("Capitalize"),
    ty("Uncapitalize"),
    ty("ArrayBufferLike"),
];

const ES2015: &[LibGlobal] = &[
    both("Map"),
    both("WeakMap"),
    both("Set"),
    both("WeakSet"),
    both("Promise"),
    both("Proxy"),
    both("Reflect"),
    both("Symbol"),
    ty("MapConstructor"),
    ty("SetConstructor"),
    ty("PromiseConstructor"),
    ty("ReadonlyMap"),
    ty("ReadonlySet"),
    ty("Iterable"),
    ty("Iterator"),
    ty("IterableIterator"),
    ty("IteratorResult"),
    ty("Generator"),
    ty("GeneratorFunction"),
    ty("ProxyHandler"),
];

const ES2016: &[LibGlobal] = &[];

const ES2017: &[LibGlobal] = &[both("SharedArrayBuffer"), both("Atomics")];

const ES2018: &[LibGlobal] = &[
    ty("AsyncIterable"),
    ty("AsyncIterator"),
    ty("AsyncIterableIterator"),
    ty("AsyncGenerator"),
    ty("AsyncGeneratorFunction"),
];

const ES2019: &[LibGlobal] = &[ty("FlatArray")];

const ES2020: &[LibGlobal] = &[
    both("BigInt"),
    both("BigInt64Array"),
    both("BigUint64Array"),
    value("globalThis"),
];

const ES2021: &[LibGlobal] = &[
    both("WeakRef"),
    both("FinalizationRegistry"),
    both("AggregateError"),
];

const ES2022: &[LibGlobal] = &[ty("ErrorOptions")];

const ES2023: &[LibGlobal] = &[];

const DOM: &[LibGlobal] = &[
    value("window"),
    value("self"),
    value("document"),
    value("navigator"),
    value("location"),
    value("history"),
    value("localStorage"),
    value("sessionStorage"),
    value("console"),
    value("alert"),
    value("confirm"),
    value("prompt"),
    value("fetch"),
    value("setTimeout"),
    value("clearTimeout"),
    value("setInterval"),
    value("clearInterval"),
    value("requestAnimationFrame"),
    value("cancelAnimationFrame"),
    value("queueMicrotask"),
    value("structuredClone"),
    both("Window"),
    both("Document"),
    both("Node"),
    both("Element"),
    both("HTMLElement"),
    both("Event"),
    both("EventTarget"),
    both("CustomEvent"),
    both("KeyboardEvent"),
    both("MouseEvent"),
    both("URL"),
    both("URLSearchParams"),
    both("Headers"),
    both("Request"),
    both("Response"),
    both("Blob"),
    both("File"),
    both("FormData"),
    both("WebSocket"),
    both("Worker"),
    both("MutationObserver"),
    both("AbortController"),
    both("AbortSignal"),
    both("TextEncoder"),
    both("TextDecoder"),
    ty("HTMLElementTagNameMap"),
    ty("EventListener"),
    ty("RequestInit"),
];

/// Every global contributed by `lib`, including lower ES levels
pub fn globals(lib: LibName) -> impl Iterator<Item = &'static LibGlobal> {
    let levels: &[&[LibGlobal]] = match lib {
        LibName::Es5 => &[ES5],
        LibName::Es2015 => &[ES5, ES2015],
        LibName::Es2016 => &[ES5, ES2015, ES2016],
        LibName::Es2017 => &[ES5, ES2015, ES2016, ES2017],
        LibName::Es2018 => &[ES5, ES2015, ES2016, ES2017, ES2018],
        LibName::Es2019 => &[ES5, ES2015, ES2016, ES2017, ES2018, ES2019],
        LibName::Es2020 => &[ES5, ES2015, ES2016, ES2017, ES2018, ES2019, ES2020],
        LibName::Es2021 => &[ES5, ES2015, ES2016, ES2017, ES2018, ES2019, ES2020, ES2021],
        LibName::Es2022 => &[ES5, ES2015, ES2016, ES2017, ES2018, ES2019, ES2020, ES2021, ES2022],
        LibName::Es2023 | LibName::EsNext => &[
            ES5, ES2015, ES2016, ES2017, ES2018, ES2019, ES2020, ES2021, ES2022, ES2023,
        ],
        LibName::Dom => &[DOM],
    };
    levels.iter().flat_map(|level| level.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_es_levels_are_cumulative() {
        let names: Vec<_> = globals(LibName::Es2017).map(|g| g.name).collect();
        assert!(names.contains(&"Object"));
        assert!(names.contains(&"Promise"));
        assert!(names.contains(&"Atomics"));
        assert!(!names.contains(&"BigInt"));
    }

    #[test]
    fn test_dom_is_separate_from_es() {
        assert!(globals(LibName::Dom).any(|g| g.name == "document"));
        assert!(!globals(LibName::Dom).any(|g| g.name == "Object"));
    }

    #[test]
    fn test_type_only_names_have_no_value() {
        let partial = globals(LibName::Es5).find(|g| g.name == "Partial").unwrap();
        assert!(partial.type_mode);
        assert!(!partial.value);
    }
}
