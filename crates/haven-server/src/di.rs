//! Dependency injection module using Shaku.
//!
//! `HavenModule` wires the whole process: the MySQL pool and repositories,
//! the Redis store behind the cache service, security components and the
//! marketplace services that the REST layer resolves.

use haven_config::AppConfig;
use haven_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlFavoriteRepository,
    MySqlPropertyRepository, MySqlUserRepository,
};
use haven_security::{
    PasswordHasher, PasswordHasherParameters, TokenProvider, TokenProviderInterface,
    TokenProviderParameters,
};
use haven_service::{
    AuthServiceComponent, CacheAdminServiceComponent, CacheServiceImpl, CacheServiceImplParameters,
    CacheTtls, FavoriteServiceComponent, PropertyServiceComponent, RedisStore,
    UserServiceComponent, VolatileStore,
};
use shaku::{module, HasComponent};
use std::sync::Arc;

module! {
    pub HavenModule {
        components = [
            DatabasePool,
            MySqlUserRepository,
            MySqlPropertyRepository,
            MySqlFavoriteRepository,
            RedisStore,
            CacheServiceImpl,
            PasswordHasher,
            TokenProvider,
            UserServiceComponent,
            AuthServiceComponent,
            PropertyServiceComponent,
            FavoriteServiceComponent,
            CacheAdminServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the module around an already connected database pool.
///
/// The Redis store is created closed; call [`VolatileStore::open`] on the
/// resolved store before serving.
#[must_use]
pub fn build_module(db_pool: &DatabasePool, config: &AppConfig) -> Arc<HavenModule> {
    let security_config = Arc::new(config.security.clone());
    let password_hasher = PasswordHasher::with_cost(security_config.password_hash_cost);
    let token_provider = TokenProvider::new(Arc::clone(&security_config));

    let module = HavenModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.pool(),
        })
        .with_component_parameters::<RedisStore>(RedisStore::parameters(config.redis.clone()))
        .with_component_parameters::<CacheServiceImpl>(CacheServiceImplParameters {
            ttls: CacheTtls::default(),
        })
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<TokenProvider>(TokenProviderParameters {
            encoding_key: token_provider.encoding_key().clone(),
            decoding_key: token_provider.decoding_key().clone(),
            config: security_config,
            validation: token_provider.validation().clone(),
        })
        .build();

    Arc::new(module)
}

/// Resolves the infrastructure the process manages directly.
pub trait InfrastructureResolver {
    fn volatile_store(&self) -> Arc<dyn VolatileStore>;

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;

    fn token_provider(&self) -> Arc<dyn TokenProviderInterface>;
}

impl InfrastructureResolver for HavenModule {
    fn volatile_store(&self) -> Arc<dyn VolatileStore> {
        HasComponent::<dyn VolatileStore>::resolve(self)
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        HasComponent::<dyn DatabasePoolInterface>::resolve(self)
    }

    fn token_provider(&self) -> Arc<dyn TokenProviderInterface> {
        HasComponent::<dyn TokenProviderInterface>::resolve(self)
    }
}
