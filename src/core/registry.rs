//! # Service Registry
//!
//! 타입 기반 싱글톤 서비스 로케이터입니다.
//!
//! 각 서비스는 [`register_service!`](crate::register_service) 매크로로
//! `inventory`에 생성자를 등록하고, `Type::instance()`로 공유 인스턴스를 얻습니다.
//! 데이터베이스 연결이나 이메일 발송기처럼 런타임에 만들어지는 인프라 객체는
//! 애플리케이션 시작 시 [`ServiceLocator::set`]으로 직접 주입합니다.
//!
//! ```rust,ignore
//! ServiceLocator::set(Arc::new(database));
//! ServiceLocator::initialize_all()?;
//!
//! let user_service = UserService::instance()?;
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::core::errors::{AppError, AppResult};
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

type SharedInstance = Arc<dyn Any + Send + Sync>;

/// `inventory`로 수집되는 서비스 등록 정보
pub struct ServiceRegistration {
    /// 로그 출력용 서비스 이름
    pub name: &'static str,
    /// 등록된 구현체의 `TypeId`
    pub type_id: fn() -> TypeId,
    /// 의존성을 해결하여 인스턴스를 만드는 생성자
    pub constructor: fn() -> AppResult<SharedInstance>,
}

inventory::collect!(ServiceRegistration);

/// 제네릭 타입의 `TypeId`를 함수 포인터로 노출하기 위한 헬퍼
pub fn type_id_of<T: 'static>() -> TypeId {
    TypeId::of::<T>()
}

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, SharedInstance>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

thread_local! {
    // 생성자는 의존성을 같은 스레드에서 재귀적으로 해결하므로 스레드 단위로 추적합니다.
    static INITIALIZING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 인스턴스를 조회하고, 없으면 등록된 생성자로 만들어 캐시합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 등록되지 않은 타입, 순환 의존성, 락 오염
    pub fn get<T: 'static + Send + Sync>() -> AppResult<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::cached(type_id)? {
            return downcast::<T>(instance);
        }

        if !INITIALIZING.with(|set| set.borrow_mut().insert(type_id)) {
            return Err(AppError::InternalError(format!(
                "순환 의존성이 감지되었습니다: {}",
                type_name
            )));
        }

        let built = Self::construct(type_id, type_name);

        INITIALIZING.with(|set| set.borrow_mut().remove(&type_id));

        let instance = {
            let mut instances = LOCATOR.instances.write().map_err(lock_poisoned)?;
            instances.entry(type_id).or_insert(built?).clone()
        };

        downcast::<T>(instance)
    }

    /// 외부에서 생성한 인스턴스를 등록합니다. 같은 타입이 있으면 교체합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let clean_name = extract_clean_type_name(std::any::type_name::<T>());
        log::info!("📦 Registering: {}", clean_name);

        match LOCATOR.instances.write() {
            Ok(mut instances) => {
                instances.insert(TypeId::of::<T>(), instance as SharedInstance);
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(TypeId::of::<T>(), instance as SharedInstance);
            }
        }
    }

    /// 등록 여부 확인 (생성하지 않음)
    pub fn contains<T: 'static>() -> bool {
        LOCATOR
            .instances
            .read()
            .map(|instances| instances.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }

    /// 등록된 모든 서비스를 즉시 생성합니다.
    ///
    /// 애플리케이션 시작 시 호출하여 설정 누락이나 의존성 문제를 부팅 단계에서 드러냅니다.
    pub fn initialize_all() -> AppResult<usize> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let registrations: Vec<&ServiceRegistration> =
            inventory::iter::<ServiceRegistration>().collect();

        print_step_start(1, "Creating Service instances");
        for registration in &registrations {
            let type_id = (registration.type_id)();
            if Self::cached(type_id)?.is_none() {
                print_sub_task(registration.name, "Creating...");
                let instance = (registration.constructor)()?;
                let mut instances = LOCATOR.instances.write().map_err(lock_poisoned)?;
                instances.entry(type_id).or_insert(instance);
            }
            print_sub_task(registration.name, "✓ Ready");
        }
        print_step_complete(1, "Service instances created", registrations.len());

        print_final_summary(registrations.len());
        Ok(registrations.len())
    }

    fn cached(type_id: TypeId) -> AppResult<Option<SharedInstance>> {
        let instances = LOCATOR.instances.read().map_err(lock_poisoned)?;
        Ok(instances.get(&type_id).cloned())
    }

    fn construct(type_id: TypeId, type_name: &str) -> AppResult<SharedInstance> {
        let registration = inventory::iter::<ServiceRegistration>()
            .find(|registration| (registration.type_id)() == type_id)
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "등록되지 않은 서비스입니다: {}. register_service! 또는 ServiceLocator::set으로 등록하세요",
                    type_name
                ))
            })?;

        log::debug!("서비스 생성: {}", registration.name);
        (registration.constructor)()
    }
}

fn downcast<T: 'static + Send + Sync>(instance: SharedInstance) -> AppResult<Arc<T>> {
    instance.downcast::<T>().map_err(|_| {
        AppError::InternalError(format!(
            "ServiceLocator 타입 불일치: {}",
            std::any::type_name::<T>()
        ))
    })
}

fn lock_poisoned<E>(_: E) -> AppError {
    AppError::InternalError("ServiceLocator 락이 오염되었습니다".to_string())
}

fn extract_clean_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 서비스 타입에 `instance()`를 구현하고 생성자를 레지스트리에 등록합니다.
///
/// 생성자는 `fn() -> AppResult<Self>` 형태여야 하며, 내부에서
/// 다른 서비스의 `instance()`를 호출해 의존성을 해결할 수 있습니다.
///
/// ```rust,ignore
/// register_service!(UserService, "user_service", UserService::from_registry);
/// ```
#[macro_export]
macro_rules! register_service {
    ($ty:ty, $name:expr, $ctor:path) => {
        impl $ty {
            /// 레지스트리에서 공유 인스턴스를 가져옵니다.
            pub fn instance() -> $crate::core::errors::AppResult<::std::sync::Arc<Self>> {
                $crate::core::registry::ServiceLocator::get::<Self>()
            }
        }

        ::inventory::submit! {
            $crate::core::registry::ServiceRegistration {
                name: $name,
                type_id: $crate::core::registry::type_id_of::<$ty>,
                constructor: || {
                    let service: $ty = $ctor()?;
                    Ok(::std::sync::Arc::new(service)
                        as ::std::sync::Arc<dyn ::std::any::Any + Send + Sync>)
                },
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: u32,
    }

    struct Orphan;

    struct Dependent {
        counter: Arc<Counter>,
    }

    fn build_counter() -> AppResult<Counter> {
        Ok(Counter { value: 7 })
    }

    fn build_dependent() -> AppResult<Dependent> {
        Ok(Dependent {
            counter: Counter::instance()?,
        })
    }

    register_service!(Counter, "counter_service", build_counter);
    register_service!(Dependent, "dependent_service", build_dependent);

    #[test]
    fn test_get_returns_same_instance() {
        let first = Counter::instance().unwrap();
        let second = Counter::instance().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.value, 7);
    }

    #[test]
    fn test_dependencies_are_resolved() {
        let dependent = Dependent::instance().unwrap();
        assert!(Arc::ptr_eq(&dependent.counter, &Counter::instance().unwrap()));
    }

    #[test]
    fn test_unregistered_type_is_error() {
        assert!(matches!(
            ServiceLocator::get::<Orphan>(),
            Err(AppError::InternalError(_))
        ));
    }

    #[test]
    fn test_set_overrides_instance() {
        struct Manual(&'static str);
        ServiceLocator::set(Arc::new(Manual("manual")));
        assert!(ServiceLocator::contains::<Manual>());
        assert_eq!(ServiceLocator::get::<Manual>().unwrap().0, "manual");
    }

    #[test]
    fn test_clean_type_name() {
        assert_eq!(
            extract_clean_type_name("cloakbox_api::services::users::UserService"),
            "UserService"
        );
        assert_eq!(extract_clean_type_name("Plain"), "Plain");
    }
}
