use actix_web::{web, HttpResponse};
use async_graphql::{
    http::GraphiQLSource, Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object,
    Schema as GraphQLSchema,
};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{
    app_state::AppState,
    models::dto::response::{CriterionView, SubCriterionView},
};

pub type Schema = GraphQLSchema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Subject keys present in the descriptor table.
    async fn subjects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<String>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.descriptor_service.subjects())
    }

    async fn criterion(
        &self,
        ctx: &Context<'_>,
        subject: String,
        grade: String,
        letter: String,
    ) -> async_graphql::Result<CriterionView> {
        let state = ctx.data::<AppState>()?;
        state
            .descriptor_service
            .criterion(&subject, &grade, &letter)
            .map_err(|e| e.extend())
    }

    async fn sub_criteria(
        &self,
        ctx: &Context<'_>,
        subject: String,
        grade: String,
        letter: String,
    ) -> async_graphql::Result<Vec<SubCriterionView>> {
        let state = ctx.data::<AppState>()?;
        let view = state
            .descriptor_service
            .criterion(&subject, &grade, &letter)
            .map_err(|e| e.extend())?;
        Ok(view.sub_criteria)
    }
}

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(app_state)
        .finish()
}

pub async fn graphql_handler(schema: web::Data<Schema>, request: GraphQLRequest) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .route(web::post().to(graphql_handler))
            .route(web::get().to(graphiql)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::test_app_state;

    #[actix_rt::test]
    async fn test_subjects_query() {
        let schema = create_schema(test_app_state());

        let response = schema.execute("{ subjects }").await;
        assert!(response.errors.is_empty());

        let data = response.data.into_json().unwrap();
        let subjects = data["subjects"].as_array().unwrap();
        assert!(subjects.contains(&serde_json::Value::from("design")));
    }

    #[actix_rt::test]
    async fn test_sub_criteria_query() {
        let schema = create_schema(test_app_state());

        let response = schema
            .execute(r#"{ subCriteria(subject: "Design", grade: "PEI 1", letter: "A") { numeral text } }"#)
            .await;
        assert!(response.errors.is_empty());

        let data = response.data.into_json().unwrap();
        let numerals: Vec<&str> = data["subCriteria"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["numeral"].as_str())
            .collect();
        assert_eq!(numerals, vec!["i", "ii", "iii", "iv"]);
    }

    #[actix_rt::test]
    async fn test_criterion_query_unknown_subject_has_code() {
        let schema = create_schema(test_app_state());

        let response = schema
            .execute(r#"{ criterion(subject: "Musique", grade: "PEI 1", letter: "A") { title } }"#)
            .await;
        assert_eq!(response.errors.len(), 1);

        let error = serde_json::to_value(&response.errors[0]).unwrap();
        assert_eq!(error["extensions"]["code"], "UNKNOWN_SUBJECT");
    }
}
