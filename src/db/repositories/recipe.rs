use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::recipes;
use crate::models::RecipeComplexity;

#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub complexity: String,
    pub cooking_time: i32,
    pub instruction: String,
    pub created_at: String,
}

impl From<recipes::Model> for Recipe {
    fn from(model: recipes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            complexity: model.complexity,
            cooking_time: model.cooking_time,
            instruction: model.instruction,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub complexity: RecipeComplexity,
    pub cooking_time: i32,
    pub instruction: String,
}

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: i32, recipe: NewRecipe) -> Result<Recipe> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = recipes::ActiveModel {
            user_id: Set(user_id),
            title: Set(recipe.title),
            description: Set(recipe.description),
            complexity: Set(recipe.complexity.as_str().to_string()),
            cooking_time: Set(recipe.cooking_time),
            instruction: Set(recipe.instruction),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert recipe")?;

        Ok(Recipe::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Recipe>> {
        let recipe = recipes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query recipe by ID")?;

        Ok(recipe.map(Recipe::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Recipe>> {
        let rows = recipes::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list recipes")?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Partial update: absent fields are left untouched.
    pub async fn update_fields(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        complexity: Option<RecipeComplexity>,
        cooking_time: Option<i32>,
        instruction: Option<&str>,
    ) -> Result<Recipe> {
        let recipe = recipes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query recipe for update")?
            .ok_or_else(|| anyhow::anyhow!("Recipe not found: {id}"))?;

        let mut active: recipes::ActiveModel = recipe.into();

        if let Some(title) = title {
            active.title = Set(title.to_string());
        }
        if let Some(description) = description {
            active.description = Set(description.to_string());
        }
        if let Some(complexity) = complexity {
            active.complexity = Set(complexity.as_str().to_string());
        }
        if let Some(cooking_time) = cooking_time {
            active.cooking_time = Set(cooking_time);
        }
        if let Some(instruction) = instruction {
            active.instruction = Set(instruction.to_string());
        }

        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Recipe::from(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete recipe")?;

        Ok(result.rows_affected > 0)
    }
}
