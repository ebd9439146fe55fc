//! End-to-end tests of the render pipeline.

#[cfg(test)]
mod tests {
    use crate::errors::{ErrorKind, NodeError, RenderError, ResolutionError};
    use crate::pipeline::{
        FnErrorHook, FnStateSerializer, RenderInput, RenderOptions, RenderPipeline, Renderer,
        ResultEnvelope,
    };
    use crate::request::RenderRequest;
    use crate::routing::{RouteMatch, RouteResolver};
    use crate::store::{FnStoreFactory, StateContainer, StaticStoreFactory, StoreFactory};
    use crate::testing::{fixtures, RecordingErrorHook, StubRouteResolver};
    use crate::tree::NodeDescription;
    use async_trait::async_trait;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Harness {
        resolver: Arc<StubRouteResolver>,
        hook: Arc<RecordingErrorHook>,
        pipeline: RenderPipeline,
    }

    fn harness(resolver: StubRouteResolver, emit_ids: bool) -> Harness {
        let resolver = Arc::new(resolver);
        let hook = Arc::new(RecordingErrorHook::new());
        let pipeline = RenderPipeline::builder()
            .resolver(resolver.clone())
            .components(fixtures::component_lookup())
            .store_factory(fixtures::use_redux_store_factory())
            .error_hook(hook.clone())
            .emit_ids(emit_ids)
            .build()
            .unwrap();

        Harness {
            resolver,
            hook,
            pipeline,
        }
    }

    fn tree_harness(tree: NodeDescription) -> Harness {
        harness(StubRouteResolver::tree(tree), false)
    }

    fn request() -> RenderRequest {
        RenderRequest::from_url_path("/test")
    }

    #[derive(Debug)]
    struct FixedRenderer(&'static str);

    #[async_trait]
    impl Renderer for FixedRenderer {
        async fn render(&self, _input: RenderInput<'_>) -> Result<String, NodeError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_renders_component() {
        let h = tree_harness(NodeDescription::component("Home").with_prop("checked", false));

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 200);
        let html = envelope.html.unwrap();
        assert!(html.contains("div"));
        assert!(html.contains("Home"));
        assert_eq!(h.resolver.calls(), vec!["/test".to_string()]);
        assert_eq!(h.hook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_renders_markup() {
        let h = tree_harness(NodeDescription::markup("div").with_prop("className", "foo"));

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.html.as_deref(), Some(r#"<div class="foo"></div>"#));
    }

    #[tokio::test]
    async fn test_renders_complex_tree() {
        let tree: NodeDescription = serde_json::from_value(fixtures::complex_tree()).unwrap();
        let h = tree_harness(tree);

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(
            envelope.html.as_deref(),
            Some(concat!(
                r#"<div class="foo" data-test="my-test"><div><h1>Home</h1><a class="foo">"#,
                r#"<div><h1>Home</h1></div></a></div><a class="foo"><img class="foo"/></a>"#,
                r#"<p>I am set</p></div>"#
            ))
        );
    }

    #[tokio::test]
    async fn test_prefetch_contains_state() {
        let h = tree_harness(
            NodeDescription::markup("div")
                .with_prop("className", "foo")
                .with_prop("data-test", "my-test"),
        );

        let envelope = h.pipeline.render(&request(), None).await;

        assert!(envelope
            .prefetch_script
            .unwrap()
            .contains(r#"window.__PRELOADED_STATE__ = ["Use Redux"];"#));
    }

    #[tokio::test]
    async fn test_registry_redirect() {
        let h = harness(StubRouteResolver::redirect("/test/target", "?foobar=test"), false);

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 302);
        assert_eq!(envelope.redirect_path.as_deref(), Some("/test/target?foobar=test"));
        assert!(envelope.html.is_none());
        assert_eq!(h.hook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resolution_failure() {
        let h = harness(
            StubRouteResolver::failing(
                ResolutionError::new("No route").with_status(500).with_path("/test"),
            ),
            false,
        );

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 500);
        assert!(envelope.error().unwrap().to_string().contains("No route"));
        assert_eq!(envelope.error().unwrap().kind(), ErrorKind::ResolutionFailed);
        assert_eq!(h.hook.call_count(), 1);
    }

    #[tokio::test]
    async fn test_registry_without_tree_is_not_found() {
        let h = harness(StubRouteResolver::not_found(), false);

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope, ResultEnvelope::not_found("/test not found"));
        assert_eq!(h.hook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_component_signals_not_found() {
        let h = tree_harness(NodeDescription::component("Error"));

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 404);
        assert!(envelope.cause.is_some());
        assert!(envelope.error().unwrap().is_routing_signal());
        assert_eq!(h.hook.call_count(), 1);
    }

    #[tokio::test]
    async fn test_component_signals_redirect() {
        let h = tree_harness(NodeDescription::component("RedirectError"));

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 302);
        assert_eq!(envelope.redirect_path.as_deref(), Some("/new/location"));
        assert!(envelope.cause.is_some());
        assert_eq!(h.hook.errors()[0].kind, ErrorKind::RoutingSignal);
    }

    #[tokio::test]
    async fn test_component_server_error_calls_hook() {
        let h = tree_harness(NodeDescription::component("ServerError"));

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 500);
        let errors = h.hook.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::RenderFailure);
        assert_eq!(errors[0].location.as_deref(), Some("/test"));
    }

    #[tokio::test]
    async fn test_nested_signal_still_classified() {
        let h = tree_harness(
            NodeDescription::markup("main")
                .with_child(NodeDescription::component("Home").with_child(
                    NodeDescription::component("RedirectError"),
                )),
        );

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 302);
        assert_eq!(envelope.redirect_path.as_deref(), Some("/new/location"));
    }

    #[tokio::test]
    async fn test_unknown_component() {
        let h = tree_harness(
            NodeDescription::markup("div").with_child(NodeDescription::component("Missing")),
        );

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 500);
        assert!(matches!(
            envelope.error(),
            Some(RenderError::UnknownComponent { name }) if name == "Missing"
        ));
        assert_eq!(h.hook.call_count(), 1);
    }

    #[tokio::test]
    async fn test_emit_ids_configured() {
        let h = harness(StubRouteResolver::tree(NodeDescription::markup("div")), true);

        let envelope = h.pipeline.render(&request(), None).await;

        assert!(envelope.html.unwrap().contains("data-nodeid"));
    }

    #[tokio::test]
    async fn test_emit_ids_off_by_default() {
        let h = tree_harness(NodeDescription::markup("div"));

        let envelope = h.pipeline.render(&request(), None).await;

        assert!(!envelope.html.unwrap().contains("data-nodeid"));
    }

    #[tokio::test]
    async fn test_emit_ids_call_override() {
        let h = harness(
            StubRouteResolver::tree(NodeDescription::markup("div").with_prop("styleName", "foo-bar")),
            true,
        );
        let options = RenderOptions::new().with_emit_ids(false);

        let overridden = h.pipeline.render(&request(), Some(&options)).await;
        let configured = h.pipeline.render(&request(), None).await;

        assert!(!overridden.html.unwrap().contains("data-nodeid"));
        assert!(configured.html.unwrap().contains("data-nodeid"));
    }

    #[tokio::test]
    async fn test_custom_serializer_and_renderer() {
        let pipeline = RenderPipeline::builder()
            .resolver(Arc::new(StubRouteResolver::tree(NodeDescription::component("Home"))))
            .components(fixtures::component_lookup())
            .store_factory(fixtures::use_redux_store_factory())
            .state_serializer(Arc::new(FnStateSerializer::new(|_state: &serde_json::Value| {
                "window.__TEST_STATE__".to_string()
            })))
            .render_override(Arc::new(FixedRenderer("test")))
            .build()
            .unwrap();

        let envelope = pipeline.render(&request(), None).await;

        assert_eq!(envelope.prefetch_script.as_deref(), Some("window.__TEST_STATE__"));
        assert_eq!(envelope.html.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_serializer_call_override() {
        let h = tree_harness(NodeDescription::markup("div"));
        let options = RenderOptions::new()
            .with_state_serializer(Arc::new(FnStateSerializer::new(|state: &serde_json::Value| state.to_string())));

        let envelope = h.pipeline.render(&request(), Some(&options)).await;

        assert_eq!(envelope.prefetch_script.as_deref(), Some(r#"["Use Redux"]"#));
    }

    #[tokio::test]
    async fn test_fn_error_hook_observes_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let pipeline = RenderPipeline::builder()
            .resolver(Arc::new(StubRouteResolver::tree(NodeDescription::component(
                "ServerError",
            ))))
            .components(fixtures::component_lookup())
            .store_factory(fixtures::use_redux_store_factory())
            .error_hook(Arc::new(FnErrorHook::new(move |_req: &RenderRequest, _err: &RenderError| {
                counter.fetch_add(1, Ordering::SeqCst);
            })))
            .build()
            .unwrap();

        let envelope = pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 500);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disable_ssr_skips_markup() {
        let h = tree_harness(NodeDescription::component("ServerError"));

        let envelope = h.pipeline.render(&request().without_ssr(), None).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.html.as_deref(), Some(""));
        assert!(envelope.prefetch_script.unwrap().contains("Use Redux"));
        assert_eq!(h.hook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_disable_ssr_skips_tree_building() {
        let h = tree_harness(
            NodeDescription::markup("div").with_child(NodeDescription::component("Missing")),
        );

        let envelope = h.pipeline.render(&request().without_ssr(), None).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.html.as_deref(), Some(""));
        assert_eq!(h.hook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let factory = FnStoreFactory::new(|_request, _route| {
            async { Err::<Arc<dyn StateContainer>, _>(anyhow::anyhow!("database offline")) }
                .boxed()
        });
        let hook = Arc::new(RecordingErrorHook::new());
        let pipeline = RenderPipeline::builder()
            .resolver(Arc::new(StubRouteResolver::tree(NodeDescription::markup("div"))))
            .store_factory(Arc::new(factory))
            .error_hook(hook.clone())
            .build()
            .unwrap();

        let envelope = pipeline.render(&request(), None).await;

        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.error().unwrap().kind(), ErrorKind::StoreConstructionFailed);
        assert_eq!(hook.errors()[0].kind, ErrorKind::StoreConstructionFailed);
    }

    #[tokio::test]
    async fn test_store_sees_request_and_route() {
        struct RouteContextStore;

        #[async_trait]
        impl StoreFactory for RouteContextStore {
            async fn create(
                &self,
                request: &RenderRequest,
                route: &crate::routing::ResolvedRoute,
            ) -> anyhow::Result<Arc<dyn StateContainer>> {
                Ok(Arc::new(crate::store::StaticStore::new(json!({
                    "method": request.method,
                    "context": route.context,
                }))))
            }
        }

        #[derive(Debug)]
        struct ContextResolver;

        #[async_trait]
        impl RouteResolver for ContextResolver {
            async fn resolve(&self, _location: &str) -> Result<RouteMatch, ResolutionError> {
                Ok(RouteMatch::Resolved(
                    crate::routing::ResolvedRoute::new(NodeDescription::markup("div"))
                        .with_context(json!({"page": 7})),
                ))
            }
        }

        let pipeline = RenderPipeline::builder()
            .resolver(Arc::new(ContextResolver))
            .store_factory(Arc::new(RouteContextStore))
            .build()
            .unwrap();

        let envelope = pipeline.render(&request(), None).await;

        assert_eq!(
            envelope.prefetch_script.as_deref(),
            Some(r#"window.__PRELOADED_STATE__ = {"context":{"page":7},"method":"get"};"#)
        );
    }

    #[tokio::test]
    async fn test_missing_location() {
        let h = tree_harness(NodeDescription::markup("div"));

        let envelope = h.pipeline.render(&RenderRequest::default(), None).await;

        assert_eq!(envelope.status, 400);
        assert_eq!(h.resolver.call_count(), 0);
        assert_eq!(h.hook.errors()[0].kind, ErrorKind::MissingLocation);
    }

    #[tokio::test]
    async fn test_path_preferred_over_url_path() {
        let h = tree_harness(NodeDescription::markup("div"));
        let mut req = RenderRequest::new("/direct");
        req.url = Some(crate::request::RequestUrl {
            path: Some("/from-url".to_string()),
        });

        h.pipeline.render(&req, None).await;

        assert_eq!(h.resolver.calls(), vec!["/direct".to_string()]);
    }

    #[tokio::test]
    async fn test_render_is_idempotent() {
        let tree: NodeDescription = serde_json::from_value(fixtures::complex_tree()).unwrap();
        let h = tree_harness(tree);

        let first = h.pipeline.render(&request(), None).await;
        let second = h.pipeline.render(&request(), None).await;

        assert_eq!(first, second);
        assert_eq!(h.resolver.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_idempotent() {
        let h = tree_harness(NodeDescription::component("ServerError"));

        let first = h.pipeline.render(&request(), None).await;
        let second = h.pipeline.render(&request(), None).await;

        assert_eq!(first, second);
        assert_eq!(h.hook.call_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_renders_are_isolated() {
        let pipeline = RenderPipeline::builder()
            .resolver(Arc::new(StubRouteResolver::tree(NodeDescription::component("Page"))))
            .components(fixtures::component_lookup())
            .store_factory(Arc::new(StaticStoreFactory::new(json!({"n": 1}))))
            .build()
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let pipeline = pipeline.clone();
                tokio::spawn(async move {
                    let options = RenderOptions::new().with_emit_ids(i % 2 == 0);
                    pipeline.render(&request(), Some(&options)).await
                })
            })
            .collect();

        for (i, result) in futures::future::join_all(handles).await.into_iter().enumerate() {
            let envelope = result.unwrap();
            assert_eq!(envelope.status, 200);
            let html = envelope.html.unwrap();
            assert_eq!(html.contains("data-nodeid"), i % 2 == 0);
            assert!(html.contains("Page"));
        }
    }

    #[tokio::test]
    async fn test_envelope_serializes() {
        let h = harness(StubRouteResolver::redirect("/a", ""), false);

        let envelope = h.pipeline.render(&request(), None).await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": 302, "redirectPath": "/a"})
        );
    }
}
