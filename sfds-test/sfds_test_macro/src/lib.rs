/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! Attribute macro backing `sfds_test`.
//!
//! `#[sfds_test]` turns an `async fn` returning a `Result` into a regular
//! `#[test]` that runs on its own multi-thread tokio runtime. Panics raised
//! anywhere on that runtime (including inside spawned listener tasks) are
//! recorded and re-raised on the test thread once the body finishes, so a
//! failing assertion inside a receiver callback still fails the test.

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, ItemFn};

#[proc_macro_attribute]
pub fn sfds_test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let sig = &input.sig;
    let body = &input.block;
    let attrs = &input.attrs;
    let name = &sig.ident;
    let inputs = &sig.inputs;
    let output = &sig.output;

    let async_name = syn::Ident::new(&format!("__{name}_async"), name.span());

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() {
            use std::panic;
            use std::sync::atomic::{AtomicBool, Ordering};
            use std::sync::Arc;
            use ::sfds_test::__private::parking_lot::Mutex;
            use ::sfds_test::__private::tracing;

            #[derive(Default)]
            struct PanicRecord {
                occurred: AtomicBool,
                message: Mutex<Option<String>>,
                location: Mutex<Option<String>>,
            }

            let record = Arc::new(PanicRecord::default());
            let hook_record = Arc::clone(&record);

            let previous_hook = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                hook_record.occurred.store(true, Ordering::SeqCst);
                let message = info
                    .payload()
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| info.payload().downcast_ref::<String>().cloned());
                *hook_record.location.lock() =
                    info.location().map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
                let cleaned = message
                    .clone()
                    .unwrap_or_else(|| "No error message".to_string())
                    .trim()
                    .replace('\n', " ");
                *hook_record.message.lock() = message;
                tracing::error!("Panic: {}", cleaned);
                previous_hook(info);
            }));

            let runtime = ::sfds_test::__private::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build test runtime");

            let result = runtime.block_on(async {
                let test_span = tracing::info_span!("sfds_test", name = stringify!(#name));
                let _enter = test_span.enter();

                #async_name().await
            });
            runtime.shutdown_background();

            if record.occurred.load(Ordering::SeqCst) {
                let location = record
                    .location
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "unknown location".to_string());
                let message = record
                    .message
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "No error message".to_string())
                    .trim()
                    .replace('\n', " ");
                panic!("Panic at {}: {}", location, message);
            }

            result.unwrap();
        }

        async fn #async_name(#inputs) #output #body
    };

    expanded.into()
}
